use std::path::Path;

use filetime::FileTime;

use crate::error::{MetadataError, Result};
use crate::Metadata;

/// Which fields to restore, mirroring the `--perms`/`--times` flags in
/// `engine::Options`. Ownership is attempted whenever the metadata records a
/// non-default owner; lack of privilege to `chown` is not treated as an
/// error (the upstream behaviour this core follows when unprivileged).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RestoreFlags {
    pub preserve_perms: bool,
    pub preserve_times: bool,
    pub preserve_owner: bool,
}

/// Applies the recorded metadata to `path` per `flags`.
pub fn restore(path: &Path, meta: &Metadata, flags: RestoreFlags) -> Result<()> {
    if flags.preserve_times {
        let mtime = FileTime::from_unix_time(meta.mtime, 0);
        filetime::set_file_mtime(path, mtime).map_err(|source| MetadataError::SetTimes {
            path: path.to_path_buf(),
            source,
        })?;
    }
    if flags.preserve_perms {
        set_permissions(path, meta)?;
    }
    if flags.preserve_owner {
        // Best-effort: an unprivileged process cannot chown to an
        // arbitrary uid/gid; that failure is not surfaced as an error.
        let _ = set_owner(path, meta);
    }
    Ok(())
}

#[cfg(unix)]
fn set_permissions(path: &Path, meta: &Metadata) -> Result<()> {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    let perms = fs::Permissions::from_mode(meta.mode & 0o7777);
    fs::set_permissions(path, perms).map_err(|source| MetadataError::SetPermissions {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(not(unix))]
fn set_permissions(_path: &Path, _meta: &Metadata) -> Result<()> {
    Ok(())
}

#[cfg(unix)]
fn set_owner(path: &Path, meta: &Metadata) -> Result<()> {
    rustix::fs::chown(
        path,
        Some(rustix::fs::Uid::from_raw(meta.uid)),
        Some(rustix::fs::Gid::from_raw(meta.gid)),
    )
    .map_err(|source| MetadataError::SetOwner {
        path: path.to_path_buf(),
        source: std::io::Error::from(source),
    })
}

#[cfg(not(unix))]
fn set_owner(_path: &Path, _meta: &Metadata) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn restores_mtime_when_requested() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f");
        fs::write(&path, b"x").unwrap();

        let meta = Metadata {
            mode: 0o644,
            uid: 0,
            gid: 0,
            size: 1,
            mtime: 1_000_000,
        };
        restore(
            &path,
            &meta,
            RestoreFlags {
                preserve_times: true,
                ..Default::default()
            },
        )
        .unwrap();

        let got = fs::metadata(&path).unwrap();
        let mtime = FileTime::from_last_modification_time(&got);
        assert_eq!(mtime.unix_seconds(), 1_000_000);
    }

    #[cfg(unix)]
    #[test]
    fn restores_permission_bits_when_requested() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f");
        fs::write(&path, b"x").unwrap();

        let meta = Metadata {
            mode: 0o600,
            uid: 0,
            gid: 0,
            size: 1,
            mtime: 0,
        };
        restore(
            &path,
            &meta,
            RestoreFlags {
                preserve_perms: true,
                ..Default::default()
            },
        )
        .unwrap();

        use std::os::unix::fs::PermissionsExt;
        let got = fs::metadata(&path).unwrap();
        assert_eq!(got.permissions().mode() & 0o777, 0o600);
    }
}
