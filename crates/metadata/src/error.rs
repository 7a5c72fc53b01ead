use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("failed to stat {path}: {source}")]
    Stat { path: PathBuf, source: io::Error },
    #[error("failed to set permissions on {path}: {source}")]
    SetPermissions { path: PathBuf, source: io::Error },
    #[error("failed to set times on {path}: {source}")]
    SetTimes { path: PathBuf, source: io::Error },
    #[error("failed to set owner on {path}: {source}")]
    SetOwner { path: PathBuf, source: io::Error },
}

pub type Result<T> = std::result::Result<T, MetadataError>;
