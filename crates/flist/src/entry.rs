use std::path::{Path, PathBuf};

use metadata::Metadata;

/// One file-list record: a canonical path relative to the transfer root,
/// its metadata, and an optional symlink target.
///
/// The "working path" `spec.md` describes (where the receiver places bytes
/// on disk) is deliberately not a stored field — it is a view derived from
/// the list's root directory handle, computed by [`Entry::working_path`],
/// not an owned string duplicated per entry.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Entry {
    pub path: String,
    pub metadata: Metadata,
    pub symlink_target: Option<String>,
}

impl Entry {
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.metadata.mode & 0o170000 == 0o040000
    }

    #[must_use]
    pub fn is_symlink(&self) -> bool {
        self.symlink_target.is_some()
    }

    /// The on-disk path this entry resolves to under `root`.
    #[must_use]
    pub fn working_path(&self, root: &Path) -> PathBuf {
        root.join(&self.path)
    }
}
