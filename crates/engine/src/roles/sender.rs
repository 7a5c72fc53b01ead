use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use checksums::hash_file;
use flist::{build_local, write_file_list, Entry, Root};
use logging::Sink;
use matching::generate_tokens;
use protocol::token::{write_digest, write_end, write_token};
use signature::read_block_set;

use crate::error::Result;
use crate::session::Session;
use crate::stats::{send_stats, SessionStats};

/// Runs the sender side of `spec.md` §4.7's main loop: send the file list,
/// then answer the receiver's phase 1 and phase 2 block-set requests with
/// token streams until each phase's `-1` separator.
pub fn run_sender<S: Read + Write>(
    session: &mut Session<S>,
    roots: &[Root<'_>],
    source_root: &Path,
    sink: &mut dyn Sink,
) -> Result<SessionStats> {
    let entries = build_local(roots, session.opts.recursive, session.opts.preserve_links, sink)?;
    write_file_list(&mut session.channel, &entries)?;

    let mut stats = SessionStats::default();
    answer_phase(session, &entries, source_root, &mut stats)?;
    answer_phase(session, &entries, source_root, &mut stats)?;

    send_stats(&mut session.channel, &stats)?;
    Ok(stats)
}

fn answer_phase<S: Read + Write>(
    session: &mut Session<S>,
    entries: &[Entry],
    source_root: &Path,
    stats: &mut SessionStats,
) -> Result<()> {
    loop {
        let idx = session.channel.read_int()?;
        if idx == -1 {
            break;
        }
        let idx = idx as usize;
        let blocks = read_block_set(&mut session.channel)?;
        let entry = &entries[idx];
        let path = entry.working_path(source_root);
        let data = fs::read(&path)?;

        stats.total_file_size += data.len() as u64;
        stats.bytes_read += data.len() as u64;

        let tokens = generate_tokens(&data, &blocks, session.seed);
        let mut written = 0u64;
        for token in &tokens {
            if let protocol::Token::Literal(bytes) = token {
                written += bytes.len() as u64;
            }
            write_token(&mut session.channel, token)?;
        }
        write_end(&mut session.channel)?;
        let digest = hash_file(&data, session.seed);
        write_digest(&mut session.channel, &digest)?;
        stats.bytes_written += written;
    }
    // Acknowledge the phase separator so the receiver can proceed.
    session.channel.write_int(-1)?;
    Ok(())
}
