/// Smallest block length this implementation will pick automatically.
pub const SIGNATURE_MIN_BLOCK_LEN: u32 = 512;
/// Largest block length this implementation will pick automatically.
pub const SIGNATURE_MAX_BLOCK_LEN: u32 = 131_072;

/// Chooses a nominal block length for a file of the given size, absent an
/// explicit `--block-size` override.
///
/// Target block count is `ceil(sqrt(size))`, clamped to
/// `[SIGNATURE_MIN_BLOCK_LEN, SIGNATURE_MAX_BLOCK_LEN]` so the wire cost of
/// fast checksums alone (`blksz * 4` bytes) stays bounded for both tiny and
/// huge files.
pub struct SignatureLayout;

impl SignatureLayout {
    #[must_use]
    pub fn block_len_for(size: u64) -> u32 {
        if size == 0 {
            return SIGNATURE_MIN_BLOCK_LEN;
        }
        let root = (size as f64).sqrt().ceil() as u64;
        let candidate = root.clamp(
            u64::from(SIGNATURE_MIN_BLOCK_LEN),
            u64::from(SIGNATURE_MAX_BLOCK_LEN),
        );
        candidate as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiny_files_clamp_to_the_minimum() {
        assert_eq!(SignatureLayout::block_len_for(10), SIGNATURE_MIN_BLOCK_LEN);
        assert_eq!(SignatureLayout::block_len_for(0), SIGNATURE_MIN_BLOCK_LEN);
    }

    #[test]
    fn huge_files_clamp_to_the_maximum() {
        assert_eq!(
            SignatureLayout::block_len_for(1 << 40),
            SIGNATURE_MAX_BLOCK_LEN
        );
    }

    #[test]
    fn mid_size_file_tracks_sqrt() {
        // sqrt(1_048_576) == 1024 exactly.
        assert_eq!(SignatureLayout::block_len_for(1_048_576), 1024);
    }
}
