use std::path::PathBuf;

/// Which side of the block-delta exchange this process plays.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Role {
    /// No network, no child process: both ends of the session run
    /// in-process over a loopback pipe (see [`crate::transport::local_pipe_pair`]).
    Local,
    Sender,
    Receiver,
}

/// How a remote host argument was spelled, when present.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RemoteSyntax {
    /// `rsync://host/module/path`
    Url,
    /// `host::module/path`
    DoubleColon,
    /// `host:path`, launched through a remote shell.
    RemoteShell,
}

/// The parsed command line, resolved to the tuple the driver consumes once
/// to build a remote argv and pick a transport, per `spec.md` §3.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FileArgs {
    pub host: Option<String>,
    pub sources: Vec<PathBuf>,
    pub sink: PathBuf,
    pub role: Role,
    pub remote_syntax: Option<RemoteSyntax>,
    pub module: Option<String>,
}

impl FileArgs {
    /// A purely local transfer: no host, loopback role.
    #[must_use]
    pub fn local(sources: Vec<PathBuf>, sink: PathBuf) -> Self {
        Self {
            host: None,
            sources,
            sink,
            role: Role::Local,
            remote_syntax: None,
            module: None,
        }
    }
}
