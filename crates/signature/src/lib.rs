//! Per-file block descriptor tables ("block sets" / "signatures").
//!
//! # Upstream reference
//!
//! `extern.h`'s `struct blkset`/`struct blk` and the `blk_*` function family.
//! This crate owns construction, wire serialisation, and parsing of the
//! block set the receiver sends the sender before a block-delta exchange.

mod block;
mod error;
mod layout;
mod wire;

pub use block::{Block, BlockSet};
pub use error::{Result, SignatureError};
pub use layout::SignatureLayout;
pub use wire::{read_block_set, write_block_set};
