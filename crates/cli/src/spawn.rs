//! Remote-shell process spawning.
//!
//! Grounded on the `ConnectProgramStream` wrapper used for
//! `RSYNC_CONNECT_PROG` daemon connections: a `Read + Write` stream backed
//! by a child process's piped stdin/stdout, killed on drop. Here the child
//! is `ssh host rsync-path --server [--sender]` rather than a daemon connect
//! program, which is the one remote transport this core implements directly
//! — dialling a daemon socket stays an external collaborator's job.

use std::io::{self, Read, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use engine::transport::RemoteSpawn;

/// Spawns the remote peer through `ssh`, handing the engine a duplex stream
/// over the child's stdin/stdout.
#[derive(Debug, Default)]
pub struct ShellSpawn;

impl RemoteSpawn for ShellSpawn {
    type Stream = ChildProcessStream;

    fn spawn(&self, rsync_path: &str, host: &str, argv: &[String]) -> io::Result<Self::Stream> {
        let mut builder = Command::new("ssh");
        builder.arg(host).arg(rsync_path).args(argv);
        builder.stdin(Stdio::piped());
        builder.stdout(Stdio::piped());
        builder.stderr(Stdio::inherit());

        let mut child = builder.spawn()?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| io::Error::other("ssh child did not expose a writable stdin"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::other("ssh child did not expose a readable stdout"))?;

        Ok(ChildProcessStream {
            child,
            stdin,
            stdout,
        })
    }
}

/// A `Read + Write` façade over a spawned remote peer's stdin/stdout,
/// terminating the child when dropped.
pub struct ChildProcessStream {
    child: Child,
    stdin: ChildStdin,
    stdout: ChildStdout,
}

impl Read for ChildProcessStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stdout.read(buf)
    }
}

impl Write for ChildProcessStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stdin.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stdin.flush()
    }
}

impl Drop for ChildProcessStream {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// A `Read + Write` façade over the process's own stdin/stdout, used when
/// this binary is itself the remote end spawned by a peer's `--server`
/// invocation.
#[derive(Debug, Default)]
pub struct StdioStream {
    stdin: io::Stdin,
    stdout: io::Stdout,
}

impl StdioStream {
    #[must_use]
    pub fn new() -> Self {
        Self {
            stdin: io::stdin(),
            stdout: io::stdout(),
        }
    }
}

impl Read for StdioStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stdin.read(buf)
    }
}

impl Write for StdioStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stdout.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }
}

/// Builds the argv this core's own `--server` invocation expects on the
/// remote end, mirroring the flags [`crate::args::Args`] understands.
#[must_use]
pub fn server_argv(opts: &engine::Options, role_is_sender: bool) -> Vec<String> {
    let mut argv = vec!["--server".to_string()];
    if role_is_sender {
        argv.push("--sender".to_string());
    }
    if opts.recursive {
        argv.push("-r".to_string());
    }
    for _ in 0..opts.verbose {
        argv.push("-v".to_string());
    }
    if opts.dry_run {
        argv.push("-n".to_string());
    }
    if opts.preserve_times {
        argv.push("-t".to_string());
    }
    if opts.preserve_perms {
        argv.push("-p".to_string());
    }
    if opts.preserve_links {
        argv.push("-l".to_string());
    }
    if opts.delete {
        argv.push("--delete".to_string());
    }
    argv.push(".".to_string());
    argv
}
