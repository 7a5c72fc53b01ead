use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlistError {
    #[error("path contains a '..' component or otherwise escapes the root: {0}")]
    PathUnsafe(String),
    #[error("file list entry has an empty path")]
    EmptyPath,
    #[error("file list wire bytes are malformed: {0}")]
    Malformed(String),
    #[error(transparent)]
    Metadata(#[from] metadata::MetadataError),
    #[error(transparent)]
    Protocol(#[from] protocol::ProtocolError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FlistError>;
