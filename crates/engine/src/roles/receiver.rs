use std::fs;
use std::io::{Cursor, Read, Write};
use std::path::Path;

use flist::{apply_deletions, deletion_set, read_file_list, Entry};
use logging::Sink;
use protocol::{CSUM_LENGTH_PHASE1, CSUM_LENGTH_PHASE2};
use signature::{write_block_set, BlockSet, SignatureLayout};
use transfer::{reconstruct_file, CommitOutcome};

use crate::error::{FileError, Result};
use crate::session::Session;
use crate::stats::{recv_stats, SessionStats};

/// Runs the receiver/generator side of `spec.md` §4.7's main loop: after
/// the sender's file list arrives, walk it in order requesting a block-set
/// exchange for every regular file, merging the resulting token stream and
/// either committing it or queuing it for a phase-2 retry.
pub fn run_receiver<S: Read + Write>(
    session: &mut Session<S>,
    root: &Path,
    sink: &mut dyn Sink,
) -> Result<SessionStats> {
    let entries = read_file_list(&mut session.channel)?;

    if session.opts.delete {
        let to_delete = deletion_set(root, &entries);
        apply_deletions(root, &to_delete, session.opts.dry_run, sink)?;
    }

    for entry in &entries {
        if entry.is_dir() {
            if !session.opts.dry_run {
                fs::create_dir_all(entry.working_path(root))?;
            }
        } else if let Some(link_target) = &entry.symlink_target {
            if !session.opts.dry_run {
                let path = entry.working_path(root);
                let _ = fs::remove_file(&path);
                create_symlink(link_target, &path)?;
            }
        }
    }

    let mut stats = SessionStats::default();
    let retry = run_phase(session, &entries, root, None, CSUM_LENGTH_PHASE1, &mut stats)?;
    run_phase(
        session,
        &entries,
        root,
        Some(&retry),
        CSUM_LENGTH_PHASE2,
        &mut stats,
    )?;

    let (peer_read, peer_written, peer_size) = recv_stats(&mut session.channel)?;
    stats.bytes_read += peer_read;
    stats.bytes_written += peer_written;
    stats.total_file_size += peer_size;

    Ok(stats)
}

/// Runs one phase over either every regular file (`retry_only = None`) or
/// just the indices named in it (phase 2). Returns the indices that still
/// need a retry after this phase.
fn run_phase<S: Read + Write>(
    session: &mut Session<S>,
    entries: &[Entry],
    root: &Path,
    retry_only: Option<&[usize]>,
    csum: usize,
    stats: &mut SessionStats,
) -> Result<Vec<usize>> {
    let mut retry = Vec::new();

    let candidates: Vec<usize> = match retry_only {
        Some(indices) => indices.to_vec(),
        None => entries
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.is_dir() && !e.is_symlink())
            .map(|(i, _)| i)
            .collect(),
    };

    for idx in candidates {
        let entry = &entries[idx];
        let target = entry.working_path(root);
        let local_data = fs::read(&target).unwrap_or_default();
        let block_len = SignatureLayout::block_len_for(entry.metadata.size);
        let blocks = BlockSet::build(&local_data, block_len, csum, session.seed);

        session.channel.write_int(idx as i32)?;
        write_block_set(&mut session.channel, &blocks)?;

        let mut local_cursor = Cursor::new(local_data);
        if session.opts.dry_run {
            // Still drain the token stream so the channel stays in sync.
            drain_tokens(session)?;
            continue;
        }
        match reconstruct_file(
            &mut session.channel,
            &mut local_cursor,
            &blocks,
            session.seed,
            &target,
            &entry.metadata,
            session.opts.restore_flags(),
        ) {
            Ok(CommitOutcome::Committed) => {}
            Ok(CommitOutcome::NeedsRetry) => {
                if csum == CSUM_LENGTH_PHASE2 {
                    stats.file_errors.push(FileError::DigestMismatch {
                        path: target.clone(),
                    });
                } else {
                    retry.push(idx);
                }
            }
            Err(err) => stats.file_errors.push(FileError::FsIo {
                path: target.clone(),
                source: std::io::Error::other(err.to_string()),
            }),
        }
    }

    session.channel.write_int(-1)?;
    let ack = session.channel.read_int()?;
    debug_assert_eq!(ack, -1);

    Ok(retry)
}

fn drain_tokens<S: Read + Write>(session: &mut Session<S>) -> Result<()> {
    use protocol::token::{read_digest, read_token};
    while read_token(&mut session.channel)?.is_some() {}
    read_digest(&mut session.channel)?;
    Ok(())
}

#[cfg(unix)]
fn create_symlink(target: &str, link: &Path) -> Result<()> {
    std::os::unix::fs::symlink(target, link)?;
    Ok(())
}

#[cfg(not(unix))]
fn create_symlink(target: &str, link: &Path) -> Result<()> {
    std::os::windows::fs::symlink_file(target, link)?;
    Ok(())
}
