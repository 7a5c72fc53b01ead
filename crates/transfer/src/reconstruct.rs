use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use checksums::Seed;
use metadata::{Metadata, RestoreFlags};
use protocol::Channel;
use signature::BlockSet;

use crate::error::Result;
use crate::merger::{merge, MergeOutcome};

/// Result of reconstructing one file.
#[derive(Debug)]
pub enum CommitOutcome {
    /// Digest verified; the file was renamed into place and its metadata
    /// restored.
    Committed,
    /// Digest mismatch; the caller should requeue this file for a phase-2
    /// retry (or record a hard error if this already was phase 2).
    NeedsRetry,
}

/// Opens a transfer-unique temp file beside `target` (same directory, so
/// the final rename is same-filesystem and atomic), streams the token
/// stream from `chan` into it, and on digest match renames it into place
/// and restores `meta` per `flags`.
///
/// `local` is the receiver's existing (possibly stale, possibly absent)
/// copy of the file to source block references from; pass an empty reader
/// when there is no local copy yet.
pub fn reconstruct_file<S, L>(
    chan: &mut Channel<S>,
    local: &mut L,
    blocks: &BlockSet,
    seed: Seed,
    target: &Path,
    meta: &Metadata,
    flags: RestoreFlags,
) -> Result<CommitOutcome>
where
    S: Read + Write,
    L: Read + std::io::Seek,
{
    let dir = target.parent().unwrap_or_else(|| Path::new("."));
    let basename = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp_path = temp_sibling_path(dir, &basename);

    let mut temp_file = File::create(&temp_path)?;
    let outcome = merge(chan, local, blocks, seed, &mut temp_file)?;
    temp_file.flush()?;
    drop(temp_file);

    match outcome {
        MergeOutcome::Verified => {
            fs::rename(&temp_path, target)?;
            metadata::restore(target, meta, flags)?;
            Ok(CommitOutcome::Committed)
        }
        MergeOutcome::DigestMismatch => {
            let _ = fs::remove_file(&temp_path);
            Ok(CommitOutcome::NeedsRetry)
        }
    }
}

fn temp_sibling_path(dir: &Path, basename: &str) -> PathBuf {
    let suffix = transfer_unique_suffix();
    dir.join(format!(".{basename}.{suffix}"))
}

/// A short, session-unique suffix for temp file names. Not cryptographic —
/// only needs to avoid colliding with another in-flight transfer of the
/// same basename.
fn transfer_unique_suffix() -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    let pid = std::process::id();
    format!("{pid:x}-{n:x}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use protocol::token::{write_digest, write_end};
    use std::io::Cursor;

    fn channel(data: Vec<u8>) -> Channel<Cursor<Vec<u8>>> {
        Channel::new(Cursor::new(data), |_, _| {})
    }

    #[test]
    fn commits_on_verified_digest_and_cleans_up_temp_name() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.txt");

        let mut wire = channel(Vec::new());
        write_end(&mut wire).unwrap();
        let digest = checksums::hash_file(&[], 0);
        write_digest(&mut wire, &digest).unwrap();
        let bytes = wire.into_inner().into_inner();

        let mut chan = channel(bytes);
        let mut local = Cursor::new(Vec::new());
        let blocks = BlockSet::build(&[], 1024, 16, 0);
        let meta = Metadata {
            mode: 0o644,
            uid: 0,
            gid: 0,
            size: 0,
            mtime: 0,
        };

        let outcome = reconstruct_file(
            &mut chan,
            &mut local,
            &blocks,
            0,
            &target,
            &meta,
            RestoreFlags::default(),
        )
        .unwrap();

        assert!(matches!(outcome, CommitOutcome::Committed));
        assert!(target.exists());
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with('.'))
            .collect();
        assert!(leftovers.is_empty());
    }
}
