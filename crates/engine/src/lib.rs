//! Session driver: version handshake, the sender/receiver/generator role
//! loop, and stats exchange.
//!
//! # Upstream reference
//!
//! `extern.h`'s `rsync_client`/`rsync_server`/`rsync_child` entry points and
//! the `sess`/`opts`/`fargs` structs they share. `spec.md` §9 calls for
//! factoring the role duplication into one state machine parameterised by
//! role rather than four parallel loops; here that's [`run`] dispatching on
//! [`Role`].

mod error;
mod fileargs;
mod options;
mod roles;
mod session;
mod stats;
pub mod transport;

pub use error::{FileError, Result, SessionError};
pub use fileargs::{FileArgs, RemoteSyntax, Role};
pub use options::Options;
pub use roles::{run_receiver, run_sender};
pub use session::Session;
pub use stats::SessionStats;

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::thread;

use flist::Root;
use logging::Sink;

/// Builds the `Root<'_>` list the sender side walks: one root per source
/// path, named after its final path component.
fn sender_roots(sources: &[PathBuf]) -> (Vec<String>, PathBuf) {
    let names = sources
        .iter()
        .map(|p| {
            p.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        })
        .collect();
    let source_root = sources
        .first()
        .and_then(|p| p.parent())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    (names, source_root)
}

/// Drives one side of a transfer to completion, dispatching on
/// `fileargs.role`. `Role::Sender` answers block-set requests with token
/// streams; `Role::Receiver` walks the file list requesting block sets and
/// merging the results. `Role::Local` has no pre-existing peer connection to
/// hand in as `session` — use [`run_local`] instead.
pub fn run<S: Read + Write>(
    mut session: Session<S>,
    fileargs: &FileArgs,
    sink: &mut dyn Sink,
) -> Result<SessionStats> {
    match fileargs.role {
        Role::Sender => {
            let (names, source_root) = sender_roots(&fileargs.sources);
            let roots: Vec<Root<'_>> = fileargs
                .sources
                .iter()
                .zip(&names)
                .map(|(fs_path, name)| Root {
                    fs_path,
                    list_name: name,
                })
                .collect();
            run_sender(&mut session, &roots, &source_root, sink)
        }
        Role::Receiver => run_receiver(&mut session, &fileargs.sink, sink),
        Role::Local => run_local(session.opts.clone(), fileargs, sink),
    }
}

/// Drives a `Role::Local` transfer end-to-end: both ends of the driver run
/// in-process over [`transport::local_pipe_pair`], the sender role on a
/// background thread and the receiver role inline, and the two sides' stats
/// are combined once both finish.
pub fn run_local(
    opts: Options,
    fileargs: &FileArgs,
    sink: &mut dyn Sink,
) -> Result<SessionStats> {
    let (sender_stream, receiver_stream) = transport::local_pipe_pair()?;

    let sender_opts = opts.clone();
    let sources = fileargs.sources.clone();
    let sender_handle = thread::spawn(move || -> Result<SessionStats> {
        let mut session =
            Session::handshake_as_seed_reader(sender_opts.clone(), sender_stream)?;
        let (names, source_root) = sender_roots(&sources);
        let roots: Vec<Root<'_>> = sources
            .iter()
            .zip(&names)
            .map(|(fs_path, name)| Root {
                fs_path,
                list_name: name,
            })
            .collect();
        let mut sender_sink = logging::TracingSink::new(sender_opts.verbose);
        run_sender(&mut session, &roots, &source_root, &mut sender_sink)
    });

    let mut receiver_session = Session::handshake_as_seed_generator(opts, receiver_stream)?;
    let receiver_stats = run_receiver(&mut receiver_session, &fileargs.sink, sink)?;

    let mut stats = sender_handle
        .join()
        .map_err(|_| SessionError::Remote("sender thread panicked".to_string()))??;
    stats.bytes_read += receiver_stats.bytes_read;
    stats.bytes_written += receiver_stats.bytes_written;
    stats.total_file_size += receiver_stats.total_file_size;
    stats.file_errors.extend(receiver_stats.file_errors);

    Ok(stats)
}
