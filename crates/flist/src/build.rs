use std::fs;
use std::path::Path;

use logging::{Level, Sink};

use crate::canon::canonicalize;
use crate::entry::Entry;
use crate::error::Result;

/// One transfer-root argument: `fs_path` is where it lives on the sender's
/// disk, `list_name` is the path it should appear under in the file list
/// (normally the last component of `fs_path`).
pub struct Root<'a> {
    pub fs_path: &'a Path,
    pub list_name: &'a str,
}

/// Builds the file list for a set of transfer roots: per `spec.md` §4.6,
/// non-recursive mode includes only the literal arguments (directories are
/// recorded but not descended); recursive mode walks each directory
/// depth-first with entries sorted lexicographically within each directory.
///
/// The result is sorted, deduplicated by canonical path, and has directories
/// ahead of their contents.
pub fn build_local(
    roots: &[Root<'_>],
    recursive: bool,
    preserve_links: bool,
    sink: &mut dyn Sink,
) -> Result<Vec<Entry>> {
    let mut entries = Vec::new();
    for root in roots {
        push_one(root, recursive, preserve_links, &mut entries, sink)?;
    }
    entries.sort_by(|a, b| a.path.cmp(&b.path));
    entries.dedup_by(|a, b| a.path == b.path);
    Ok(entries)
}

fn push_one(
    root: &Root<'_>,
    recursive: bool,
    preserve_links: bool,
    out: &mut Vec<Entry>,
    sink: &mut dyn Sink,
) -> Result<()> {
    let canon_name = canonicalize(root.list_name)?;
    let fs_meta = fs::symlink_metadata(root.fs_path)?;

    if fs_meta.is_symlink() {
        if !preserve_links {
            return Ok(());
        }
        let target = fs::read_link(root.fs_path)?;
        out.push(Entry {
            path: canon_name,
            metadata: metadata::capture(root.fs_path)?,
            symlink_target: Some(target.to_string_lossy().into_owned()),
        });
        return Ok(());
    }

    let meta = metadata::capture(root.fs_path)?;
    let is_dir = fs_meta.is_dir();
    out.push(Entry {
        path: canon_name.clone(),
        metadata: meta,
        symlink_target: None,
    });

    if is_dir && recursive {
        walk_dir(root.fs_path, &canon_name, preserve_links, out, sink)?;
    }
    Ok(())
}

fn walk_dir(
    fs_dir: &Path,
    canon_prefix: &str,
    preserve_links: bool,
    out: &mut Vec<Entry>,
    sink: &mut dyn Sink,
) -> Result<()> {
    let mut children: Vec<_> = fs::read_dir(fs_dir)?.collect::<std::io::Result<Vec<_>>>()?;
    children.sort_by_key(|d| d.file_name());

    for child in children {
        let name = child.file_name();
        let name = name.to_string_lossy();
        let child_path = child.path();
        let child_canon = format!("{canon_prefix}/{name}");
        let child_meta = fs::symlink_metadata(&child_path)?;

        if child_meta.is_symlink() {
            if !preserve_links {
                continue;
            }
            let target = fs::read_link(&child_path)?;
            out.push(Entry {
                path: child_canon,
                metadata: metadata::capture(&child_path)?,
                symlink_target: Some(target.to_string_lossy().into_owned()),
            });
            continue;
        }

        if child_meta.is_file() {
            out.push(Entry {
                path: child_canon,
                metadata: metadata::capture(&child_path)?,
                symlink_target: None,
            });
        } else if child_meta.is_dir() {
            out.push(Entry {
                path: child_canon.clone(),
                metadata: metadata::capture(&child_path)?,
                symlink_target: None,
            });
            walk_dir(&child_path, &child_canon, preserve_links, out, sink)?;
        } else {
            sink.emit(
                Level::Info(2),
                &format!("skipping special file {}", child_path.display()),
            );
        }
    }
    Ok(())
}
