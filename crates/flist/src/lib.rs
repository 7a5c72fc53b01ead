//! File-list construction, wire encoding, and deletion-set computation.
//!
//! # Upstream reference
//!
//! `extern.h`'s `struct flist`/`struct flstat` and the `flist_gen_local`,
//! `flist_send`, `flist_recv`, `flist_del`, `flist_free` function family.

mod build;
mod canon;
mod delete;
mod entry;
mod error;
mod wire;

pub use build::{build_local, Root};
pub use canon::canonicalize;
pub use delete::{apply_deletions, deletion_set};
pub use entry::Entry;
pub use error::{FlistError, Result};
pub use wire::{read_file_list, write_file_list};
