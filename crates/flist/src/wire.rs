use std::io::{Read, Write};

use protocol::Channel;

use crate::canon::canonicalize;
use crate::entry::Entry;
use crate::error::{FlistError, Result};
use metadata::Metadata;

const FLAG_SHARED_PREFIX: u8 = 0x01;
const FLAG_SYMLINK: u8 = 0x02;
const FLAG_SAME_MODE: u8 = 0x20;
const FLAG_SAME_MTIME: u8 = 0x40;
/// Marker bit set on every real record so the all-zero byte is free to mean
/// "end of list" unambiguously, even for an entry whose other flags would
/// otherwise all be clear (first entry, no shared prefix, not a symlink,
/// nothing to carry forward from a predecessor).
const FLAG_ENTRY: u8 = 0x80;

/// Writes the file list: one delta-compressed record per entry, terminated
/// by a single zero status byte. Byte-identical encoding is required to
/// interoperate, per `spec.md` §4.6.
pub fn write_file_list<S: Read + Write>(chan: &mut Channel<S>, entries: &[Entry]) -> Result<()> {
    let mut prev_path = String::new();
    let mut prev_mode: Option<u32> = None;
    let mut prev_mtime: Option<i64> = None;

    for entry in entries {
        let shared = common_prefix_len(&prev_path, &entry.path);
        let suffix = &entry.path[shared..];

        let same_mode = prev_mode == Some(entry.metadata.mode);
        let same_mtime = prev_mtime == Some(entry.metadata.mtime);

        let mut status = FLAG_ENTRY;
        if shared > 0 {
            status |= FLAG_SHARED_PREFIX;
        }
        if entry.is_symlink() {
            status |= FLAG_SYMLINK;
        }
        if same_mode {
            status |= FLAG_SAME_MODE;
        }
        if same_mtime {
            status |= FLAG_SAME_MTIME;
        }
        chan.write_byte(status)?;

        if shared > 0 {
            chan.write_byte(u8::try_from(shared).unwrap_or(u8::MAX))?;
        }

        let suffix_bytes = suffix.as_bytes();
        if suffix_bytes.len() < 0xff {
            chan.write_byte(suffix_bytes.len() as u8)?;
        } else {
            chan.write_byte(0xff)?;
            chan.write_int(i32::try_from(suffix_bytes.len()).expect("path fits in i32"))?;
        }
        chan.write_buf(suffix_bytes)?;

        chan.write_long(entry.metadata.size as i64)?;
        if !same_mtime {
            chan.write_int(i32::try_from(entry.metadata.mtime).unwrap_or(0))?;
        }
        if !same_mode {
            chan.write_int(entry.metadata.mode as i32)?;
        }

        if let Some(target) = &entry.symlink_target {
            let bytes = target.as_bytes();
            chan.write_int(i32::try_from(bytes.len()).expect("symlink target fits in i32"))?;
            chan.write_buf(bytes)?;
        }

        prev_path = entry.path.clone();
        prev_mode = Some(entry.metadata.mode);
        prev_mtime = Some(entry.metadata.mtime);
    }

    chan.write_byte(0)
}

/// Reads the file list the sender wrote with [`write_file_list`]. The
/// receiver accepts the order as authoritative and does not re-sort.
pub fn read_file_list<S: Read + Write>(chan: &mut Channel<S>) -> Result<Vec<Entry>> {
    let mut entries = Vec::new();
    let mut prev_path = String::new();
    let mut prev_mode: Option<u32> = None;
    let mut prev_mtime: Option<i64> = None;

    loop {
        let status = chan.read_byte()?;
        if status == 0 {
            break;
        }

        let shared = if status & FLAG_SHARED_PREFIX != 0 {
            chan.read_byte()? as usize
        } else {
            0
        };
        if shared > prev_path.len() {
            return Err(FlistError::Malformed(format!(
                "shared prefix {shared} exceeds previous path length {}",
                prev_path.len()
            )));
        }

        let suffix_len_byte = chan.read_byte()?;
        let suffix_len = if suffix_len_byte == 0xff {
            chan.read_int()? as usize
        } else {
            suffix_len_byte as usize
        };
        let suffix = chan.read_buf_exact(suffix_len)?;
        let suffix = String::from_utf8(suffix)
            .map_err(|_| FlistError::Malformed("non-utf8 path suffix".into()))?;

        let path = format!("{}{}", &prev_path[..shared], suffix);
        let path = canonicalize(&path)?;

        let size = chan.read_long()?;
        let mtime = if status & FLAG_SAME_MTIME != 0 {
            prev_mtime.ok_or_else(|| FlistError::Malformed("same-mtime with no predecessor".into()))?
        } else {
            i64::from(chan.read_int()?)
        };
        let mode = if status & FLAG_SAME_MODE != 0 {
            prev_mode.ok_or_else(|| FlistError::Malformed("same-mode with no predecessor".into()))?
        } else {
            chan.read_int()? as u32
        };

        let symlink_target = if status & FLAG_SYMLINK != 0 {
            let len = chan.read_int()?;
            if len < 0 {
                return Err(FlistError::Malformed(format!(
                    "negative symlink target length {len}"
                )));
            }
            let bytes = chan.read_buf_exact(len as usize)?;
            Some(
                String::from_utf8(bytes)
                    .map_err(|_| FlistError::Malformed("non-utf8 symlink target".into()))?,
            )
        } else {
            None
        };

        prev_path = path.clone();
        prev_mode = Some(mode);
        prev_mtime = Some(mtime);

        entries.push(Entry {
            path,
            metadata: Metadata {
                mode,
                uid: 0,
                gid: 0,
                size: size as u64,
                mtime,
            },
            symlink_target,
        });
    }

    Ok(entries)
}

fn common_prefix_len(a: &str, b: &str) -> usize {
    a.bytes()
        .zip(b.bytes())
        .take_while(|(x, y)| x == y)
        .count()
        .min(u8::MAX as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use metadata::Metadata;
    use std::io::Cursor;

    fn channel(data: Vec<u8>) -> Channel<Cursor<Vec<u8>>> {
        Channel::new(Cursor::new(data), |_, _| {})
    }

    fn entry(path: &str, mode: u32, mtime: i64, size: u64) -> Entry {
        Entry {
            path: path.to_string(),
            metadata: Metadata {
                mode,
                uid: 0,
                gid: 0,
                size,
                mtime,
            },
            symlink_target: None,
        }
    }

    #[test]
    fn round_trips_entries_sharing_prefixes_and_attributes() {
        let entries = vec![
            entry("proj", 0o40755, 1000, 0),
            entry("proj/a.txt", 0o100644, 1000, 5),
            entry("proj/b.txt", 0o100644, 2000, 9),
        ];

        let mut chan = channel(Vec::new());
        write_file_list(&mut chan, &entries).unwrap();
        let bytes = chan.into_inner().into_inner();

        let mut chan = channel(bytes);
        let parsed = read_file_list(&mut chan).unwrap();
        assert_eq!(parsed, entries);
    }

    #[test]
    fn round_trips_a_symlink_entry() {
        let entries = vec![Entry {
            path: "l".to_string(),
            metadata: Metadata {
                mode: 0o120777,
                uid: 0,
                gid: 0,
                size: 0,
                mtime: 42,
            },
            symlink_target: Some("t".to_string()),
        }];

        let mut chan = channel(Vec::new());
        write_file_list(&mut chan, &entries).unwrap();
        let bytes = chan.into_inner().into_inner();

        let mut chan = channel(bytes);
        let parsed = read_file_list(&mut chan).unwrap();
        assert_eq!(parsed, entries);
    }

    #[test]
    fn empty_list_is_just_the_terminator() {
        let mut chan = channel(Vec::new());
        write_file_list(&mut chan, &[]).unwrap();
        let bytes = chan.into_inner().into_inner();
        assert_eq!(bytes, vec![0]);
    }
}
