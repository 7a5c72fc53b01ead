use clap::Parser;

/// The flag set this core recognizes, matching the subset of upstream
/// `rsync`'s option grammar this crate documents: `--sender`, `--server`,
/// `-r`, `-v` (repeatable), `-n`, `-t`, `-p`, `-l`, `--delete`, and
/// `--rsync-path=PATH`, plus positional source/destination operands.
#[derive(Parser, Debug, Clone)]
#[command(name = "rsync27", about = "wire-compatible rsync protocol 27 core")]
pub struct Args {
    /// Acts as the sending side of a transfer (used when invoked as the
    /// remote peer over a shell).
    #[arg(long)]
    pub sender: bool,

    /// Acts as the remote-invoked peer rather than the local client.
    #[arg(long)]
    pub server: bool,

    /// Recurse into directories.
    #[arg(short = 'r', long = "recursive")]
    pub recursive: bool,

    /// Increase verbosity; may be repeated up to four times.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Dry run: show what would be transferred without writing anything.
    #[arg(short = 'n', long = "dry-run")]
    pub dry_run: bool,

    /// Preserve modification times.
    #[arg(short = 't', long = "times")]
    pub times: bool,

    /// Preserve permissions.
    #[arg(short = 'p', long = "perms")]
    pub perms: bool,

    /// Preserve symlinks as symlinks rather than following them.
    #[arg(short = 'l', long = "links")]
    pub links: bool,

    /// Delete files on the receiving side that are absent from the sender's
    /// file list.
    #[arg(long)]
    pub delete: bool,

    /// Path to the remote `rsync27` binary, for remote-shell invocations.
    #[arg(long = "rsync-path", default_value = "rsync")]
    pub rsync_path: String,

    /// Source path(s), and finally the destination path. Kept as raw
    /// strings rather than `PathBuf` because a remote operand looks like
    /// `host:path`, which [`crate::resolve`] parses before any local path
    /// type is assigned. At least one source and a destination are required
    /// outside `--server` mode, where the peer supplies them implicitly via
    /// the session handshake instead.
    #[arg(trailing_var_arg = true)]
    pub paths: Vec<String>,
}
