use thiserror::Error;

/// Errors raised while parsing or resolving argv, before a session ever
/// starts.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("need at least one source and a destination")]
    MissingOperands,
    #[error("{0}")]
    ArgParse(String),
    #[error("only one operand may name a remote host")]
    MultipleRemotes,
    #[error("daemon transport (rsync:// or host::module) is not implemented by this core; use remote-shell host:path syntax")]
    DaemonUnsupported,
    #[error(transparent)]
    Engine(#[from] engine::SessionError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;

impl CliError {
    /// Maps this error onto the process exit codes `spec.md` §6 names:
    /// `2` for a protocol version mismatch, `23` for a generic I/O failure,
    /// `1` for everything else this core can produce before a session even
    /// starts.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Engine(engine::SessionError::Protocol(protocol::ProtocolError::ProtocolVersion(_))) => 2,
            Self::Engine(engine::SessionError::Io(_)) | Self::Io(_) => 23,
            _ => 1,
        }
    }
}
