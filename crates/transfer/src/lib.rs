//! Block merger: consumes a token stream and reconstructs a file, verifying
//! the trailing whole-file digest before committing it into place.
//!
//! # Upstream reference
//!
//! `extern.h`'s `blk_recv`/`blk_recv_ack`/`blk_merge` family and the
//! temp-file-then-rename commit step described in `spec.md` §4.5/§6.

mod error;
mod merger;
mod reconstruct;

pub use error::{Result, TransferError};
pub use merger::{merge, MergeOutcome};
pub use reconstruct::{reconstruct_file, CommitOutcome};
