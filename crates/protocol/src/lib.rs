//! Wire-level framing for rsync protocol version 27.
//!
//! This crate is the "framed I/O" layer from the design: typed reads and
//! writes of bytes, 32-bit ints, 64-bit longs, and length-prefixed buffers,
//! plus the multiplex demultiplexer that lets out-of-band log text share a
//! byte stream with binary data. Nothing here knows about files, block sets,
//! or sessions; [`Channel`] is a thin façade other crates build on.

mod channel;
mod error;
pub mod mux;
pub mod token;
pub mod version;

pub use channel::Channel;
pub use error::{ProtocolError, Result};
pub use mux::MessageCode;
pub use token::Token;
pub use version::{ProtocolVersion, RSYNC_PROTOCOL};

/// Maximum number of bytes carried by a single literal-run wire record.
///
/// Longer runs are split into successive records of this size (see
/// `matching::generate_delta`).
pub const MAX_CHUNK: usize = 32 * 1024;

/// Truncated strong-checksum length used during phase 1 matching.
pub const CSUM_LENGTH_PHASE1: usize = 2;

/// Full strong-checksum length used during phase 2 matching and for
/// whole-file verification digests.
pub const CSUM_LENGTH_PHASE2: usize = 16;
