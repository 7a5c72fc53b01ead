//! Argv parsing and process wiring for the sync core.
//!
//! This crate is the one the driver treats as an external collaborator
//! (see `engine`'s module docs): it owns argv parsing, remote-shell process
//! spawning, and the process exit code, and hands the driver nothing but an
//! `Options`/`FileArgs` pair and a connected stream.

mod args;
mod error;
mod resolve;
mod spawn;

pub use args::Args;
pub use error::{CliError, Result};
pub use resolve::resolve;
pub use spawn::{server_argv, ChildProcessStream, ShellSpawn, StdioStream};

use clap::Parser;
use engine::transport::RemoteSpawn;
use engine::{RemoteSyntax, Role, Session, SessionStats};

/// Parses `argv`, runs the resulting transfer, and returns the process exit
/// code. `argv[0]` is expected to be the program name, matching
/// `std::env::args()`.
#[must_use]
pub fn run_cli<I: IntoIterator<Item = String>>(argv: I) -> i32 {
    match try_run(argv) {
        Ok(stats) => {
            if stats.had_errors() {
                1
            } else {
                0
            }
        }
        Err(err) => {
            eprintln!("rsync27: {err}");
            err.exit_code()
        }
    }
}

fn try_run<I: IntoIterator<Item = String>>(argv: I) -> Result<SessionStats> {
    let args = Args::try_parse_from(argv).map_err(|e| CliError::ArgParse(e.to_string()))?;
    logging::init_global_subscriber(args.verbose);

    let (opts, fileargs) = resolve(&args)?;
    let mut sink = logging::TracingSink::new(opts.verbose);

    if args.server {
        let stream = StdioStream::new();
        let session = handshake(opts, fileargs.role, stream)?;
        return Ok(engine::run(session, &fileargs, &mut sink)?);
    }

    let Some(host) = fileargs.host.clone() else {
        return Ok(engine::run_local(opts, &fileargs, &mut sink)?);
    };

    match fileargs.remote_syntax {
        Some(RemoteSyntax::RemoteShell) => {
            let spawner = ShellSpawn;
            let remote_argv = server_argv(&opts, fileargs.role == Role::Receiver);
            let stream = spawner.spawn(&opts.rsync_path, &host, &remote_argv)?;
            let session = handshake(opts, fileargs.role, stream)?;
            Ok(engine::run(session, &fileargs, &mut sink)?)
        }
        Some(RemoteSyntax::Url) | Some(RemoteSyntax::DoubleColon) => {
            Err(CliError::DaemonUnsupported)
        }
        None => unreachable!("resolve() always sets remote_syntax when host is set"),
    }
}

/// Performs the version/seed handshake as whichever side `role` names:
/// the sender reads the seed the receiver generates.
fn handshake<S: std::io::Read + std::io::Write>(
    opts: engine::Options,
    role: Role,
    stream: S,
) -> Result<Session<S>> {
    let session = match role {
        Role::Sender => Session::handshake_as_seed_reader(opts, stream),
        Role::Receiver | Role::Local => Session::handshake_as_seed_generator(opts, stream),
    }?;
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_operands_exits_nonzero() {
        let code = run_cli(["rsync27".to_string()]);
        assert_eq!(code, 1);
    }
}
