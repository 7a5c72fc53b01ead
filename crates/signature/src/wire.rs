use std::io::{Read, Write};

use protocol::Channel;

use crate::block::{Block, BlockSet};
use crate::error::{Result, SignatureError};

/// Writes a block set as `blksz, len, csum, rem` followed by `blksz` records
/// of (4-byte fast checksum, `csum`-byte strong checksum prefix).
pub fn write_block_set<S: Read + Write>(chan: &mut Channel<S>, bs: &BlockSet) -> Result<()> {
    chan.write_int(i32::try_from(bs.blocks.len()).expect("block count fits in i32"))?;
    chan.write_int(i32::try_from(bs.len).expect("block length fits in i32"))?;
    chan.write_int(i32::try_from(bs.csum).expect("checksum length fits in i32"))?;
    chan.write_int(i32::try_from(bs.rem).expect("remainder fits in i32"))?;
    for block in &bs.blocks {
        chan.write_int(block.fast as i32)?;
        chan.write_buf(&block.strong[..bs.csum])?;
    }
    Ok(())
}

/// Parses a block set, rejecting negative or absurd counts per the wire
/// contract.
pub fn read_block_set<S: Read + Write>(chan: &mut Channel<S>) -> Result<BlockSet> {
    let blksz = chan.read_int()?;
    if blksz < 0 {
        return Err(SignatureError::InvalidBlockCount(i64::from(blksz)));
    }
    let len = chan.read_int()?;
    if len < 0 {
        return Err(SignatureError::NonPositiveBlockLength(i64::from(len)));
    }
    let csum = chan.read_int()?;
    if !(0..=16).contains(&csum) {
        return Err(SignatureError::ChecksumTooLong(i64::from(csum)));
    }
    let rem = chan.read_int()?;
    if rem < 0 {
        return Err(SignatureError::NegativeRemainder(i64::from(rem)));
    }

    let blksz = blksz as usize;
    let csum = csum as usize;
    let mut blocks = Vec::with_capacity(blksz);
    for idx in 0..blksz {
        let fast = chan.read_int()? as u32;
        let mut strong = [0u8; 16];
        let prefix = chan.read_buf_exact(csum)?;
        strong[..csum].copy_from_slice(&prefix);
        let this_len = if idx + 1 == blksz && rem != 0 {
            rem as u32
        } else {
            len as u32
        };
        blocks.push(Block {
            offs: u64::from(len as u32) * idx as u64,
            idx,
            len: this_len,
            fast,
            strong,
        });
    }

    let size = if blksz == 0 {
        0
    } else {
        u64::from(len as u32) * (blksz as u64 - 1) + u64::from(blocks.last().map_or(0, |b| b.len))
    };

    Ok(BlockSet {
        size,
        len: len as u32,
        rem: rem as u32,
        csum,
        blocks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn channel(data: Vec<u8>) -> Channel<Cursor<Vec<u8>>> {
        Channel::new(Cursor::new(data), |_, _| {})
    }

    #[test]
    fn round_trips_a_non_trivial_block_set() {
        let data = vec![3u8; 2500];
        let original = BlockSet::build(&data, 1024, 16, 7);

        let mut chan = channel(Vec::new());
        write_block_set(&mut chan, &original).unwrap();
        let bytes = chan.into_inner().into_inner();

        let mut chan = channel(bytes);
        let parsed = read_block_set(&mut chan).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn round_trips_the_empty_file_special_case() {
        let original = BlockSet::build(&[], 1024, 2, 0);
        assert_eq!(original.blocks.len(), 0);

        let mut chan = channel(Vec::new());
        write_block_set(&mut chan, &original).unwrap();
        let bytes = chan.into_inner().into_inner();

        let mut chan = channel(bytes);
        let parsed = read_block_set(&mut chan).unwrap();
        assert_eq!(parsed.blocks.len(), 0);
        assert_eq!(parsed.len, 0);
        assert_eq!(parsed.rem, 0);
    }

    #[test]
    fn rejects_negative_block_count() {
        let mut chan = channel(Vec::new());
        chan.write_int(-1).unwrap();
        chan.write_int(1024).unwrap();
        chan.write_int(16).unwrap();
        chan.write_int(0).unwrap();
        let bytes = chan.into_inner().into_inner();

        let mut chan = channel(bytes);
        assert!(matches!(
            read_block_set(&mut chan),
            Err(SignatureError::InvalidBlockCount(-1))
        ));
    }
}
