use std::io::{Read, Write};

use protocol::Channel;

use crate::error::{FileError, Result};

/// Transfer totals exchanged via `sess_stats_send`/`sess_stats_recv` once
/// both phases are complete, plus the per-file errors collected along the
/// way (these do not abort the session, per `spec.md` §7).
#[derive(Debug, Default)]
pub struct SessionStats {
    pub bytes_read: u64,
    pub bytes_written: u64,
    pub total_file_size: u64,
    pub file_errors: Vec<FileError>,
}

impl SessionStats {
    #[must_use]
    pub fn had_errors(&self) -> bool {
        !self.file_errors.is_empty()
    }
}

pub fn send_stats<S: Read + Write>(chan: &mut Channel<S>, stats: &SessionStats) -> Result<()> {
    chan.write_long(stats.bytes_read as i64)?;
    chan.write_long(stats.bytes_written as i64)?;
    chan.write_long(stats.total_file_size as i64)?;
    Ok(())
}

pub fn recv_stats<S: Read + Write>(chan: &mut Channel<S>) -> Result<(u64, u64, u64)> {
    let bytes_read = chan.read_long()? as u64;
    let bytes_written = chan.read_long()? as u64;
    let total_file_size = chan.read_long()? as u64;
    Ok((bytes_read, bytes_written, total_file_size))
}
