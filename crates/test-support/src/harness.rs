use std::path::Path;
use std::thread;

use engine::transport::local_pipe_pair;
use engine::{Options, Session, SessionStats};
use flist::Root;
use logging::RecordingSink;

/// Both sides' results from a loopback transfer, kept separate (rather than
/// combined the way [`engine::run_local`] does) so assertions can check the
/// sender's and receiver's byte counts independently.
pub struct LoopbackOutcome {
    pub sender: SessionStats,
    pub receiver: SessionStats,
}

/// Runs a full sender/receiver exchange in-process over a loopback pipe,
/// the same wiring `engine::run_local` uses, for tests that want to drive
/// the protocol end to end without a CLI or a real remote peer.
///
/// `source_fs_path` is the file or directory being shared (e.g.
/// `.../proj`); it appears in the file list under its own final path
/// component, and lands at `dest_root` joined with that same component —
/// mirroring how `Entry::working_path` resolves entries against a root that
/// is the *parent* of the transferred tree, not the tree itself.
///
/// # Panics
///
/// Panics if the handshake or either role's thread fails; test callers are
/// expected to assert on the returned stats instead of tolerating a broken
/// session.
pub fn run_loopback_transfer(
    opts: Options,
    source_fs_path: &Path,
    dest_root: &Path,
) -> LoopbackOutcome {
    let (sender_stream, receiver_stream) = local_pipe_pair().expect("create loopback pipe");

    let sender_opts = opts.clone();
    let source_fs_path_owned = source_fs_path.to_path_buf();
    let source_name_owned = source_fs_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let sender_handle = thread::spawn(move || -> SessionStats {
        let mut session = Session::handshake_as_seed_reader(sender_opts, sender_stream)
            .expect("sender handshake");
        let root = Root {
            fs_path: &source_fs_path_owned,
            list_name: &source_name_owned,
        };
        let source_root = source_fs_path_owned
            .parent()
            .unwrap_or(Path::new("."))
            .to_path_buf();
        let mut sink = RecordingSink::default();
        engine::run_sender(&mut session, &[root], &source_root, &mut sink).expect("sender role")
    });

    let mut receiver_session =
        Session::handshake_as_seed_generator(opts, receiver_stream).expect("receiver handshake");
    let mut receiver_sink = RecordingSink::default();
    let receiver = engine::run_receiver(&mut receiver_session, dest_root, &mut receiver_sink)
        .expect("receiver role");

    let sender = sender_handle.join().expect("sender thread");

    LoopbackOutcome { sender, receiver }
}
