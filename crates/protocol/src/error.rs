use std::io;

/// Errors produced by the framed I/O layer.
///
/// Every variant here is transport- or protocol-fatal: callers propagate
/// these out of the session driver rather than recording them as per-file
/// failures (that distinction belongs to higher layers — see
/// `engine::SessionError`).
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The peer closed the stream, or supplied fewer bytes than a fixed-size
    /// record required.
    #[error("short read: expected {expected} bytes, got {got}")]
    ShortRead { expected: usize, got: usize },

    /// A write did not accept the full buffer (the underlying stream
    /// returned `Ok(0)` or otherwise stalled).
    #[error("short write: expected {expected} bytes, wrote {got}")]
    ShortWrite { expected: usize, got: usize },

    /// A multiplex frame header was malformed, or its declared length
    /// exceeded what this implementation will buffer.
    #[error("malformed multiplex frame: {0}")]
    MuxFrame(String),

    /// The peer advertised a protocol version this implementation does not
    /// speak (this core only speaks version 27).
    #[error("unsupported protocol version: peer advertised {0}")]
    ProtocolVersion(i32),

    /// An out-of-band `ERRX` record arrived from the peer: fatal, not a
    /// warning.
    #[error("peer reported a fatal error: {0}")]
    Remote(String),

    /// The underlying stream raised an I/O error that maps to none of the
    /// above, e.g. a broken pipe on write.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Shorthand for the result type this crate's functions return.
pub type Result<T> = std::result::Result<T, ProtocolError>;
