use std::io::{Read, Write};

use protocol::{Channel, MessageCode, ProtocolVersion};
use rand::RngCore;

use crate::error::Result;
use crate::options::Options;

/// Per-peer session state: immutable options, the agreed checksum seed, the
/// negotiated protocol version, and the framed I/O channel. `spec.md` §3
/// asks that `sess`'s mutable surface be limited to the I/O façade; here
/// that's exactly `channel` (mux state lives inside it) plus the seed and
/// version fixed once at handshake.
pub struct Session<S> {
    pub opts: Options,
    pub seed: i32,
    pub version: ProtocolVersion,
    pub channel: Channel<S>,
}

impl<S: Read + Write> Session<S> {
    /// Runs the version handshake and seed exchange as the side that
    /// generates the seed (the server/receiver side, per `spec.md` §4.7).
    pub fn handshake_as_seed_generator(opts: Options, stream: S) -> Result<Self> {
        let mut channel = Channel::new(stream, log_sink(opts.verbose));
        channel.write_int(ProtocolVersion::CURRENT.as_i32())?;
        let peer = channel.read_int()?;
        let version = ProtocolVersion::negotiate(peer)?;

        let seed = rand::thread_rng().next_u32() as i32;
        channel.write_int(seed)?;

        Ok(Self {
            opts,
            seed,
            version,
            channel,
        })
    }

    /// Runs the handshake as the side that reads the generated seed (the
    /// client/sender side).
    pub fn handshake_as_seed_reader(opts: Options, stream: S) -> Result<Self> {
        let mut channel = Channel::new(stream, log_sink(opts.verbose));
        channel.write_int(ProtocolVersion::CURRENT.as_i32())?;
        let peer = channel.read_int()?;
        let version = ProtocolVersion::negotiate(peer)?;

        let seed = channel.read_int()?;

        Ok(Self {
            opts,
            seed,
            version,
            channel,
        })
    }
}

fn log_sink(verbose: u8) -> impl FnMut(MessageCode, &[u8]) + Send + 'static {
    move |code, payload| {
        let mut sink = logging::TracingSink::new(verbose);
        let level = match code {
            MessageCode::Error => logging::Level::Error,
            MessageCode::Warning => logging::Level::Warn,
            _ => logging::Level::Info(2),
        };
        logging::Sink::emit(&mut sink, level, &String::from_utf8_lossy(payload));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::local_pipe_pair;
    use std::thread;

    #[test]
    fn loopback_handshake_agrees_on_version_and_seed() {
        let (a, b) = local_pipe_pair().unwrap();
        let handle = thread::spawn(move || {
            Session::handshake_as_seed_generator(Options::default(), a).unwrap()
        });
        let client = Session::handshake_as_seed_reader(Options::default(), b).unwrap();
        let server = handle.join().unwrap();

        assert_eq!(client.version, ProtocolVersion::CURRENT);
        assert_eq!(server.version, ProtocolVersion::CURRENT);
        assert_eq!(client.seed, server.seed);
    }
}
