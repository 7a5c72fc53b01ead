use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use logging::{Level, Sink};

use crate::entry::Entry;
use crate::error::Result;

/// Computes the deletion set: paths present under `root` on disk but absent
/// from the newly received file list, ordered depth-first so children are
/// removed before their parents.
#[must_use]
pub fn deletion_set(root: &Path, received: &[Entry]) -> Vec<String> {
    let keep: BTreeSet<&str> = received.iter().map(|e| e.path.as_str()).collect();
    let mut on_disk = Vec::new();
    walk(root, root, &mut on_disk);
    on_disk.retain(|p| !keep.contains(p.as_str()));
    // Deepest paths first so `rmdir`-style removal never hits a non-empty
    // directory.
    on_disk.sort_by_key(|p| std::cmp::Reverse(p.matches('/').count()));
    on_disk
}

fn walk(root: &Path, dir: &Path, out: &mut Vec<String>) {
    let Ok(read) = fs::read_dir(dir) else {
        return;
    };
    for child in read.flatten() {
        let path = child.path();
        let Ok(rel) = path.strip_prefix(root) else {
            continue;
        };
        let rel = rel.to_string_lossy().replace('\\', "/");
        out.push(rel);
        if path.is_dir() && !path.is_symlink() {
            walk(root, &path, out);
        }
    }
}

/// Applies a deletion set computed by [`deletion_set`]. In dry-run mode the
/// unlink is suppressed but the log line is still emitted, per `spec.md`
/// §4.6.
pub fn apply_deletions(
    root: &Path,
    to_delete: &[String],
    dry_run: bool,
    sink: &mut dyn Sink,
) -> Result<()> {
    for rel in to_delete {
        let path = root.join(rel);
        sink.emit(Level::Info(1), &format!("deleting {rel}"));
        if dry_run {
            continue;
        }
        let result = if path.is_dir() && !path.is_symlink() {
            fs::remove_dir(&path)
        } else {
            fs::remove_file(&path)
        };
        if let Err(err) = result {
            sink.emit(Level::Warn, &format!("failed to delete {rel}: {err}"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Entry;
    use logging::RecordingSink;
    use metadata::Metadata;

    fn entry(path: &str) -> Entry {
        Entry {
            path: path.to_string(),
            metadata: Metadata {
                mode: 0o100644,
                uid: 0,
                gid: 0,
                size: 0,
                mtime: 0,
            },
            symlink_target: None,
        }
    }

    #[test]
    fn deletes_files_absent_from_the_new_list_before_their_parent() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("sub")).unwrap();
        fs::write(root.join("a"), b"a").unwrap();
        fs::write(root.join("sub/b"), b"b").unwrap();
        fs::write(root.join("c"), b"c").unwrap();

        let received = vec![entry("a"), entry("c")];
        let to_delete = deletion_set(root, &received);
        assert_eq!(to_delete, vec!["sub/b".to_string(), "sub".to_string()]);

        let mut sink = RecordingSink::default();
        apply_deletions(root, &to_delete, false, &mut sink).unwrap();
        assert!(!root.join("sub").exists());
        assert!(root.join("a").exists());
        assert!(root.join("c").exists());
    }

    #[test]
    fn dry_run_still_logs_but_keeps_files() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("b"), b"b").unwrap();

        let to_delete = vec!["b".to_string()];
        let mut sink = RecordingSink::default();
        apply_deletions(root, &to_delete, true, &mut sink).unwrap();
        assert!(root.join("b").exists());
        assert_eq!(sink.events.len(), 1);
    }
}
