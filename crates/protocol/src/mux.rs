//! Multiplex demultiplexer: interleaves binary data with out-of-band log text
//! on a single read channel.
//!
//! # Upstream reference
//!
//! `io.c:read_loop()` / `io.c:readfd()` in rsync's C sources multiplex the
//! receive channel this same way once both sides agree to start muxing
//! (which happens unconditionally for the receiver's read channel in this
//! protocol version). Frame header: 4 bytes, 24-bit length in the low bits,
//! an 8-bit tag in the high byte. Tag 7 is data; tags 0-6 carry a line of
//! out-of-band text, handed back through the `on_message` callback for the
//! caller to route to a log sink.

use std::io::{self, Read};

use crate::error::{ProtocolError, Result};

/// Tag marking a data-plane frame; everything else is out-of-band.
pub const MSG_DATA: u8 = 7;

/// Classification of an out-of-band multiplex frame, mirroring the log
/// codes used on the wire upstream.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MessageCode {
    /// Tag 0: unused placeholder, surfaced at the lowest severity.
    None,
    /// Tag 1: a per-file transfer error.
    ErrorXfer,
    /// Tag 2: informational progress text (`-v` output).
    Info,
    /// Tag 3: a fatal error report from the peer.
    Error,
    /// Tag 4: a non-fatal warning.
    Warning,
    /// Tag 5: a plain log line.
    Log,
    /// Tag 6: client-directed text.
    Client,
}

impl MessageCode {
    fn from_tag(tag: u8) -> Self {
        match tag {
            1 => Self::ErrorXfer,
            2 => Self::Info,
            3 => Self::Error,
            4 => Self::Warning,
            5 => Self::Log,
            6 => Self::Client,
            _ => Self::None,
        }
    }

    /// Whether a message of this kind is session-fatal per §7 of the design
    /// (`ERRX` aborts; `LOG`/`WARN` do not).
    #[must_use]
    pub const fn is_fatal(self) -> bool {
        matches!(self, Self::Error)
    }
}

/// A frame header: 24-bit payload length packed with an 8-bit tag in the
/// high byte, sent as 4 raw bytes (low byte first).
fn read_header<R: Read>(mut r: R) -> Result<(u8, usize)> {
    let mut raw = [0u8; 4];
    match r.read_exact(&mut raw) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
            return Err(ProtocolError::ShortRead {
                expected: 4,
                got: 0,
            })
        }
        Err(e) => return Err(e.into()),
    }
    let len = u32::from(raw[0]) | (u32::from(raw[1]) << 8) | (u32::from(raw[2]) << 16);
    Ok((raw[3], len as usize))
}

/// Caps a single out-of-band frame's payload so a corrupt or hostile peer
/// cannot force an unbounded allocation.
const MAX_OOB_FRAME: usize = 1 << 20;

/// Wraps a byte stream, transparently draining out-of-band frames and
/// exposing only the data-plane bytes to callers.
///
/// Disabled (`enabled == false`) by default: reads pass straight through
/// until `enable()` is called, matching the handshake-then-mux-on sequence
/// the design calls for.
pub struct Demultiplexer<R> {
    inner: R,
    enabled: bool,
    remaining: usize,
}

impl<R: Read> Demultiplexer<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            enabled: false,
            remaining: 0,
        }
    }

    /// Switches the read channel into multiplexed mode. Irreversible for
    /// the lifetime of the session.
    pub fn enable(&mut self) {
        self.enabled = true;
        self.remaining = 0;
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Reads up to `buf.len()` data-plane bytes, draining and dispatching
    /// any out-of-band frames encountered along the way to `on_message`.
    ///
    /// Returns the number of bytes placed in `buf`. Never returns 0 unless
    /// `buf` is empty — on EOF mid-frame this returns `ShortRead`.
    pub fn read_data(
        &mut self,
        buf: &mut [u8],
        mut on_message: impl FnMut(MessageCode, &[u8]),
    ) -> Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if !self.enabled {
            return self.inner.read(buf).map_err(Into::into);
        }
        while self.remaining == 0 {
            let (tag, len) = read_header(&mut self.inner)?;
            if tag == MSG_DATA {
                self.remaining = len;
                break;
            }
            if len > MAX_OOB_FRAME {
                return Err(ProtocolError::MuxFrame(format!(
                    "out-of-band frame of {len} bytes exceeds {MAX_OOB_FRAME}"
                )));
            }
            let mut payload = vec![0u8; len];
            self.inner.read_exact(&mut payload).map_err(|e| {
                if e.kind() == io::ErrorKind::UnexpectedEof {
                    ProtocolError::ShortRead {
                        expected: len,
                        got: 0,
                    }
                } else {
                    e.into()
                }
            })?;
            let code = MessageCode::from_tag(tag);
            if code.is_fatal() {
                return Err(ProtocolError::Remote(
                    String::from_utf8_lossy(&payload).into_owned(),
                ));
            }
            on_message(code, &payload);
        }
        let take = buf.len().min(self.remaining);
        self.inner.read_exact(&mut buf[..take]).map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                ProtocolError::ShortRead {
                    expected: take,
                    got: 0,
                }
            } else {
                e.into()
            }
        })?;
        self.remaining -= take;
        Ok(take)
    }

    /// Consumes the demultiplexer, returning the wrapped stream.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Direct access to the wrapped stream, for writes (which bypass the
    /// demultiplexer entirely in this protocol version).
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn frame(tag: u8, payload: &[u8]) -> Vec<u8> {
        let len = payload.len() as u32;
        let mut out = vec![
            (len & 0xff) as u8,
            ((len >> 8) & 0xff) as u8,
            ((len >> 16) & 0xff) as u8,
            tag,
        ];
        out.extend_from_slice(payload);
        out
    }

    #[test]
    fn passthrough_until_enabled() {
        let mut demux = Demultiplexer::new(Cursor::new(b"hello".to_vec()));
        let mut buf = [0u8; 5];
        let n = demux.read_data(&mut buf, |_, _| panic!("no oob")).unwrap();
        assert_eq!(&buf[..n], b"hello");
    }

    #[test]
    fn drains_out_of_band_frames_and_returns_only_data() {
        let mut wire = Vec::new();
        wire.extend(frame(2, b"starting up"));
        wire.extend(frame(MSG_DATA, b"payload-bytes"));
        let mut demux = Demultiplexer::new(Cursor::new(wire));
        demux.enable();

        let mut messages = Vec::new();
        let mut out = Vec::new();
        let mut buf = [0u8; 4];
        loop {
            let n = demux
                .read_data(&mut buf, |code, text| {
                    messages.push((code, String::from_utf8_lossy(text).into_owned()))
                })
                .unwrap();
            if n == 0 {
                break;
            }
            out.extend_from_slice(&buf[..n]);
            if out.len() >= b"payload-bytes".len() {
                break;
            }
        }
        assert_eq!(out, b"payload-bytes");
        assert_eq!(messages, vec![(MessageCode::Info, "starting up".to_string())]);
    }

    #[test]
    fn fatal_error_frame_surfaces_as_remote_error() {
        let wire = frame(3, b"boom");
        let mut demux = Demultiplexer::new(Cursor::new(wire));
        demux.enable();
        let mut buf = [0u8; 1];
        let err = demux.read_data(&mut buf, |_, _| {}).unwrap_err();
        assert!(matches!(err, ProtocolError::Remote(ref s) if s == "boom"));
    }

    #[test]
    fn oversize_frame_is_rejected() {
        let mut wire = Vec::new();
        let len = (MAX_OOB_FRAME + 1) as u32;
        wire.extend([
            (len & 0xff) as u8,
            ((len >> 8) & 0xff) as u8,
            ((len >> 16) & 0xff) as u8,
            2,
        ]);
        let mut demux = Demultiplexer::new(Cursor::new(wire));
        demux.enable();
        let mut buf = [0u8; 1];
        let err = demux.read_data(&mut buf, |_, _| {}).unwrap_err();
        assert!(matches!(err, ProtocolError::MuxFrame(_)));
    }
}
