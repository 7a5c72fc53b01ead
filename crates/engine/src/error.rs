use std::path::PathBuf;

use thiserror::Error;

/// Per-file failure, collected into [`crate::stats::SessionStats`] rather
/// than aborting the session, per `spec.md` §7's fatal/non-fatal split.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("{path}: digest mismatch after phase 2 retry")]
    DigestMismatch { path: PathBuf },
    #[error("{path}: {source}")]
    FsIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Top-level session error. Transport and protocol errors are fatal and
/// propagate out of the driver loop; everything else is a [`FileError`]
/// recorded in the session's stats.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Protocol(#[from] protocol::ProtocolError),
    #[error(transparent)]
    Flist(#[from] flist::FlistError),
    #[error(transparent)]
    Signature(#[from] signature::SignatureError),
    #[error(transparent)]
    Transfer(#[from] transfer::TransferError),
    #[error(transparent)]
    Metadata(#[from] metadata::MetadataError),
    #[error("a received path escapes the transfer root: {0}")]
    PathUnsafe(PathBuf),
    #[error("remote peer reported a fatal error: {0}")]
    Remote(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SessionError>;
