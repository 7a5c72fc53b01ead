//! Typed reads and writes over a single duplex byte stream.
//!
//! # Upstream reference
//!
//! `io.c`'s `io_read_int`/`io_write_int`/`io_read_longint`/`io_write_buf`
//! family. [`Channel`] is the one place in this workspace that touches raw
//! bytes on the wire; every other crate calls through it.

use std::io::{self, Read, Write};

use crate::error::{ProtocolError, Result};
use crate::mux::{Demultiplexer, MessageCode};

/// A framed, optionally multiplexed duplex channel to one peer.
///
/// Reads run through the [`Demultiplexer`] once multiplexing is enabled
/// (`enable_mplex_reads`); writes are never multiplexed in this protocol
/// version (`mplex_writes` is a documented no-op — see design §4.2).
pub struct Channel<S> {
    demux: Demultiplexer<S>,
    on_message: Box<dyn FnMut(MessageCode, &[u8]) + Send>,
}

impl<S: Read + Write> Channel<S> {
    /// Wraps `stream`, surfacing any out-of-band frame to `on_message` once
    /// multiplexing is enabled. Before `enable_mplex_reads` is called, reads
    /// pass straight through and `on_message` is never invoked.
    pub fn new(stream: S, on_message: impl FnMut(MessageCode, &[u8]) + Send + 'static) -> Self {
        Self {
            demux: Demultiplexer::new(stream),
            on_message: Box::new(on_message),
        }
    }

    /// Switches the read side into multiplexed mode. Idempotent.
    pub fn enable_mplex_reads(&mut self) {
        self.demux.enable();
    }

    #[must_use]
    pub fn mplex_reads(&self) -> bool {
        self.demux.is_enabled()
    }

    /// `io_read_blocking`: fills `buf` completely or fails with
    /// [`ProtocolError::ShortRead`].
    pub fn read_buf(&mut self, buf: &mut [u8]) -> Result<()> {
        let mut filled = 0;
        while filled < buf.len() {
            let on_message = &mut self.on_message;
            let n = self
                .demux
                .read_data(&mut buf[filled..], |code, text| on_message(code, text))?;
            if n == 0 {
                return Err(ProtocolError::ShortRead {
                    expected: buf.len(),
                    got: filled,
                });
            }
            filled += n;
        }
        Ok(())
    }

    /// Allocates and fills a buffer of exactly `len` bytes.
    pub fn read_buf_exact(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut out = vec![0u8; len];
        self.read_buf(&mut out)?;
        Ok(out)
    }

    /// `io_read_nonblocking`: a single opportunistic read, draining at most
    /// one chunk of out-of-band frames first. On a blocking `std` stream
    /// this still blocks until *some* data arrives; it never loops to fill
    /// `buf` completely the way [`Channel::read_buf`] does.
    pub fn read_nonblocking(&mut self, buf: &mut [u8]) -> Result<usize> {
        let on_message = &mut self.on_message;
        self.demux
            .read_data(buf, |code, text| on_message(code, text))
    }

    pub fn read_byte(&mut self) -> Result<u8> {
        let mut b = [0u8; 1];
        self.read_buf(&mut b)?;
        Ok(b[0])
    }

    pub fn write_byte(&mut self, b: u8) -> Result<()> {
        self.write_buf(&[b])
    }

    pub fn read_int(&mut self) -> Result<i32> {
        let mut raw = [0u8; 4];
        self.read_buf(&mut raw)?;
        Ok(i32::from_le_bytes(raw))
    }

    pub fn write_int(&mut self, v: i32) -> Result<()> {
        self.write_buf(&v.to_le_bytes())
    }

    /// `io_read_size`: `read_int` rejecting negative values.
    pub fn read_size(&mut self) -> Result<u32> {
        let v = self.read_int()?;
        u32::try_from(v).map_err(|_| ProtocolError::MuxFrame(format!("negative size: {v}")))
    }

    /// Reads the wire "long" encoding: an int that fits the value directly,
    /// or the sentinel `i32::MAX` followed by a full 8-byte little-endian
    /// long when it does not.
    pub fn read_long(&mut self) -> Result<i64> {
        let head = self.read_int()?;
        if head == i32::MAX {
            let mut raw = [0u8; 8];
            self.read_buf(&mut raw)?;
            Ok(i64::from_le_bytes(raw))
        } else {
            Ok(i64::from(head))
        }
    }

    pub fn write_long(&mut self, v: i64) -> Result<()> {
        if let Ok(small) = i32::try_from(v) {
            if small != i32::MAX {
                return self.write_int(small);
            }
        }
        self.write_int(i32::MAX)?;
        self.write_buf(&v.to_le_bytes())
    }

    /// `io_write_line`: appends `\n` and writes the result as a plain buffer.
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        let mut bytes = line.as_bytes().to_vec();
        bytes.push(b'\n');
        self.write_buf(&bytes)
    }

    /// `io_write_buf`: writes the full buffer or fails with `ShortWrite`.
    pub fn write_buf(&mut self, buf: &[u8]) -> Result<()> {
        let stream = self.demux.get_mut();
        let mut written = 0;
        while written < buf.len() {
            match stream.write(&buf[written..]) {
                Ok(0) => {
                    return Err(ProtocolError::ShortWrite {
                        expected: buf.len(),
                        got: written,
                    })
                }
                Ok(n) => written += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.demux.get_mut().flush().map_err(Into::into)
    }

    /// Unwraps the channel, discarding multiplex state.
    pub fn into_inner(self) -> S {
        self.demux.into_inner()
    }
}
