use checksums::{hash_slow, Seed};
use rustc_hash::FxHashMap;
use signature::BlockSet;

/// Fast-checksum index over a [`BlockSet`], used to reject non-matching
/// windows in O(1) before falling back to a strong-checksum comparison.
///
/// A 65536-entry bitset keyed by the low 16 bits of the fast checksum gives
/// the O(1) rejection the sliding window needs; the full `FxHashMap` keyed
/// by the whole 32-bit fast checksum resolves the remaining candidates.
pub struct BlockIndex {
    bitset: Box<[bool; 65536]>,
    by_fast: FxHashMap<u32, Vec<usize>>,
}

impl BlockIndex {
    #[must_use]
    pub fn build(blocks: &BlockSet) -> Self {
        let mut bitset = Box::new([false; 65536]);
        let mut by_fast: FxHashMap<u32, Vec<usize>> = FxHashMap::default();
        for block in &blocks.blocks {
            bitset[(block.fast & 0xffff) as usize] = true;
            by_fast.entry(block.fast).or_default().push(block.idx);
        }
        Self { bitset, by_fast }
    }

    /// Returns the lowest-indexed block whose fast and (truncated) strong
    /// checksum both match `window`, or `None`.
    pub fn find_match(
        &self,
        fast: u32,
        window: &[u8],
        blocks: &BlockSet,
        seed: Seed,
    ) -> Option<usize> {
        if !self.bitset[(fast & 0xffff) as usize] {
            return None;
        }
        let candidates = self.by_fast.get(&fast)?;
        let strong = hash_slow(window, seed);
        let csum = blocks.csum;
        candidates
            .iter()
            .copied()
            .filter(|&idx| blocks.blocks[idx].strong[..csum] == strong[..csum])
            .min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitset_rejects_a_fast_checksum_with_no_matching_block() {
        let data = vec![5u8; 1024];
        let blocks = BlockSet::build(&data, 1024, 16, 0);
        let index = BlockIndex::build(&blocks);
        let absent_fast = blocks.blocks[0].fast ^ 0xffff;
        assert!(index
            .find_match(absent_fast, &data, &blocks, 0)
            .is_none());
    }

    #[test]
    fn finds_the_lowest_indexed_duplicate_block() {
        let data = vec![7u8; 2048];
        let blocks = BlockSet::build(&data, 1024, 16, 0);
        let index = BlockIndex::build(&blocks);
        let window = vec![7u8; 1024];
        let fast = checksums::hash_fast(&window);
        let matched = index.find_match(fast, &window, &blocks, 0);
        assert_eq!(matched, Some(0));
    }
}
