use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("block set has a non-positive block length: {0}")]
    NonPositiveBlockLength(i64),
    #[error("block set declares a negative or absurd block count: {0}")]
    InvalidBlockCount(i64),
    #[error("block set declares a negative remainder: {0}")]
    NegativeRemainder(i64),
    #[error("strong checksum length {0} exceeds the 16-byte digest")]
    ChecksumTooLong(i64),
    #[error(transparent)]
    Protocol(#[from] protocol::ProtocolError),
}

pub type Result<T> = std::result::Result<T, SignatureError>;
