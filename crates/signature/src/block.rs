use checksums::{hash_fast, hash_slow, RollingChecksum, Seed};

/// One fixed-length (except possibly the last) slice of a file, with both
/// checksums computed over its bytes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Block {
    /// Byte offset of this block in the file.
    pub offs: u64,
    /// Position of this block in the owning [`BlockSet`].
    pub idx: usize,
    /// Length of this block in bytes.
    pub len: u32,
    /// Rolling checksum of the block's bytes.
    pub fast: u32,
    /// Full 16-byte strong digest; only the set's `csum` leading bytes are
    /// meaningful on the wire.
    pub strong: [u8; 16],
}

/// The per-file block descriptor table exchanged before a delta transfer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BlockSet {
    pub size: u64,
    pub len: u32,
    pub rem: u32,
    pub csum: usize,
    pub blocks: Vec<Block>,
}

impl BlockSet {
    /// Builds a block set over `data` using block length `len` and strong
    /// checksums truncated to `csum` bytes (2 for phase 1, 16 for phase 2).
    pub fn build(data: &[u8], len: u32, csum: usize, seed: Seed) -> Self {
        let size = data.len() as u64;
        if len == 0 || data.is_empty() {
            return Self {
                size,
                len: 0,
                rem: 0,
                csum,
                blocks: Vec::new(),
            };
        }
        let rem = (size % u64::from(len)) as u32;
        let full_blocks = (size / u64::from(len)) as usize;
        let block_count = full_blocks + usize::from(rem != 0);
        let mut blocks = Vec::with_capacity(block_count);
        for idx in 0..block_count {
            let offs = u64::from(len) * idx as u64;
            let this_len = if idx + 1 == block_count && rem != 0 {
                rem
            } else {
                len
            };
            let slice = &data[offs as usize..offs as usize + this_len as usize];
            let fast = hash_fast(slice);
            let strong = hash_slow(slice, seed);
            blocks.push(Block {
                offs,
                idx,
                len: this_len,
                fast,
                strong,
            });
        }
        Self {
            size,
            len,
            rem,
            csum,
            blocks,
        }
    }

    #[must_use]
    pub fn is_empty_file(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Re-derives a block's rolling checksum from a fresh computation,
    /// rather than the incremental `roll` the matcher uses — for tests and
    /// sanity checks, not the hot path.
    #[must_use]
    pub fn fresh_fast(slice: &[u8]) -> u32 {
        RollingChecksum::of(slice).value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_multiple_has_no_remainder_block() {
        let data = vec![0u8; 3072];
        let bs = BlockSet::build(&data, 1024, 16, 0);
        assert_eq!(bs.rem, 0);
        assert_eq!(bs.blocks.len(), 3);
        assert!(bs.blocks.iter().all(|b| b.len == 1024));
    }

    #[test]
    fn short_tail_becomes_remainder_block() {
        let data = vec![1u8; 2500];
        let bs = BlockSet::build(&data, 1024, 16, 0);
        assert_eq!(bs.rem, 452);
        assert_eq!(bs.blocks.len(), 3);
        assert_eq!(bs.blocks[2].len, 452);
        assert_eq!(bs.blocks[2].offs, 2048);
    }

    #[test]
    fn empty_file_has_no_blocks() {
        let bs = BlockSet::build(&[], 1024, 16, 0);
        assert_eq!(bs.len, 0);
        assert_eq!(bs.rem, 0);
        assert!(bs.blocks.is_empty());
    }

    #[test]
    fn totality_offsets_and_lengths_sum_to_size() {
        let data = vec![9u8; 10_007];
        let bs = BlockSet::build(&data, 777, 16, 42);
        let total: u64 = bs.blocks.iter().map(|b| u64::from(b.len)).sum();
        assert_eq!(total, bs.size);
        for b in &bs.blocks {
            assert_eq!(b.offs, u64::from(bs.len) * b.idx as u64);
        }
    }
}
