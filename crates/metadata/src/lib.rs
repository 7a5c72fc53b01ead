//! Filesystem metadata capture and restore.
//!
//! # Upstream reference
//!
//! `extern.h`'s `struct flstat` (mode/uid/gid/size/mtime) and the
//! restore-on-commit step described in `spec.md` §4.5/§4.6: permissions and
//! times are only written back when the corresponding preserve flag is set;
//! ownership is attempted only when the process has privilege to change it.

mod error;
mod restore;
mod stat;

pub use error::{MetadataError, Result};
pub use restore::{restore, RestoreFlags};
pub use stat::capture;

/// The subset of file metadata this core tracks and can restore.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Metadata {
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,
    pub size: u64,
    pub mtime: i64,
}
