//! Byte-channel transports.
//!
//! `spec.md` §9 flags `FARGS_LOCAL` ("necessary?") as underspecified: what a
//! purely local transfer (no network, no child process) should do. This
//! workspace's firm answer (recorded in `DESIGN.md`) is a loopback session:
//! both ends of the driver run in-process, connected by a duplex pipe, so
//! `Role::Local` exercises the exact same sender/receiver/generator code as
//! a networked transfer.

use std::io;

#[cfg(unix)]
use std::os::unix::net::UnixStream;

/// The concrete stream type [`local_pipe_pair`] returns: a real OS socket
/// pair on Unix, or a portable in-memory duplex pipe elsewhere.
#[cfg(unix)]
pub type LocalStream = UnixStream;
#[cfg(not(unix))]
pub type LocalStream = DuplexPipe;

/// Creates two connected, in-process duplex streams for a `Role::Local`
/// transfer.
pub fn local_pipe_pair() -> io::Result<(LocalStream, LocalStream)> {
    #[cfg(unix)]
    {
        UnixStream::pair()
    }
    #[cfg(not(unix))]
    {
        Ok(DuplexPipe::pair())
    }
}

/// A portable in-process duplex byte pipe, for platforms without
/// `UnixStream::pair`. Each end reads what the other end writes.
#[cfg(not(unix))]
pub struct DuplexPipe {
    rx: std::sync::mpsc::Receiver<u8>,
    tx: std::sync::mpsc::Sender<u8>,
    pending: std::collections::VecDeque<u8>,
}

#[cfg(not(unix))]
impl DuplexPipe {
    #[must_use]
    pub fn pair() -> (Self, Self) {
        let (tx_a, rx_a) = std::sync::mpsc::channel();
        let (tx_b, rx_b) = std::sync::mpsc::channel();
        (
            Self {
                rx: rx_a,
                tx: tx_b,
                pending: std::collections::VecDeque::new(),
            },
            Self {
                rx: rx_b,
                tx: tx_a,
                pending: std::collections::VecDeque::new(),
            },
        )
    }
}

#[cfg(not(unix))]
impl io::Read for DuplexPipe {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if self.pending.is_empty() {
            match self.rx.recv() {
                Ok(byte) => self.pending.push_back(byte),
                Err(_) => return Ok(0),
            }
        }
        while let Ok(byte) = self.rx.try_recv() {
            self.pending.push_back(byte);
            if self.pending.len() >= buf.len() {
                break;
            }
        }
        let n = buf.len().min(self.pending.len());
        for slot in buf.iter_mut().take(n) {
            *slot = self.pending.pop_front().unwrap();
        }
        Ok(n)
    }
}

#[cfg(not(unix))]
impl io::Write for DuplexPipe {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for &byte in buf {
            self.tx
                .send(byte)
                .map_err(|_| io::Error::from(io::ErrorKind::BrokenPipe))?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Spawns the remote peer process for a non-local transfer. The engine
/// depends only on this trait; `cli` supplies the real
/// `std::process::Command`-based implementation, keeping remote-shell
/// spawning an external collaborator per `spec.md` §1.
pub trait RemoteSpawn {
    type Stream: io::Read + io::Write + Send + 'static;

    /// Launches `rsync_path` against `host` with `argv`, returning the
    /// connected duplex stream to its stdin/stdout.
    fn spawn(&self, rsync_path: &str, host: &str, argv: &[String]) -> io::Result<Self::Stream>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};

    #[test]
    fn local_pipe_pair_echoes_both_directions() {
        let (mut a, mut b) = local_pipe_pair().unwrap();
        a.write_all(b"ping").unwrap();
        let mut buf = [0u8; 4];
        b.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"ping");

        b.write_all(b"pong").unwrap();
        a.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"pong");
    }
}
