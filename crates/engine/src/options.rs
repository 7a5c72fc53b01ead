use metadata::RestoreFlags;

/// Immutable record of recognized flags, per `spec.md` §3. Built once by the
/// `cli` crate and never mutated afterwards.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Options {
    pub sender: bool,
    pub server: bool,
    pub recursive: bool,
    pub verbose: u8,
    pub dry_run: bool,
    pub preserve_times: bool,
    pub preserve_perms: bool,
    pub preserve_links: bool,
    pub delete: bool,
    pub rsync_path: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            sender: false,
            server: false,
            recursive: false,
            verbose: 0,
            dry_run: false,
            preserve_times: false,
            preserve_perms: false,
            preserve_links: false,
            delete: false,
            rsync_path: "rsync".to_string(),
        }
    }
}

impl Options {
    #[must_use]
    pub fn restore_flags(&self) -> RestoreFlags {
        RestoreFlags {
            preserve_perms: self.preserve_perms,
            preserve_times: self.preserve_times,
            preserve_owner: false,
        }
    }
}
