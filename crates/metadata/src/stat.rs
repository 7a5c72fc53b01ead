use std::fs;
use std::path::Path;

use crate::error::{MetadataError, Result};
use crate::Metadata;

/// Captures the metadata this core tracks for `path` (following symlinks is
/// the caller's responsibility — pass the already-resolved path for a
/// symlink's target, or use `fs::symlink_metadata` upstream of this call if
/// the link itself should be described).
pub fn capture(path: &Path) -> Result<Metadata> {
    let meta = fs::symlink_metadata(path).map_err(|source| MetadataError::Stat {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(from_std(&meta))
}

#[cfg(unix)]
fn from_std(meta: &fs::Metadata) -> Metadata {
    use std::os::unix::fs::MetadataExt;
    Metadata {
        mode: meta.mode(),
        uid: meta.uid(),
        gid: meta.gid(),
        size: meta.size(),
        mtime: meta.mtime(),
    }
}

#[cfg(not(unix))]
fn from_std(meta: &fs::Metadata) -> Metadata {
    let mtime = meta
        .modified()
        .ok()
        .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
        .map_or(0, |d| d.as_secs() as i64);
    Metadata {
        mode: if meta.is_dir() { 0o040755 } else { 0o100644 },
        uid: 0,
        gid: 0,
        size: meta.len(),
        mtime,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn captures_size_and_a_plausible_mode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f");
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(b"hello").unwrap();
        drop(f);

        let meta = capture(&path).unwrap();
        assert_eq!(meta.size, 5);
        assert_ne!(meta.mode, 0);
    }
}
