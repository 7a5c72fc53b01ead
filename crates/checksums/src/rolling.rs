//! Rolling (weak) checksum, often called `rsum` upstream.
//!
//! # Upstream reference
//!
//! - `checksum.c:get_checksum1()` — rolling checksum computation
//! - `match.c:hash_search()` — incremental roll used while sliding the window

/// Rolling checksum used to cheaply reject non-matching window offsets
/// before paying for a strong digest comparison.
///
/// `s1` is the sum of the bytes in the window; `s2` is the sum of each byte
/// weighted by the number of bytes that follow it (inclusive). Both halves
/// are kept modulo 2^16 and packed into the 32-bit value returned by
/// [`RollingChecksum::value`] as `s1 | (s2 << 16)`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RollingChecksum {
    s1: u32,
    s2: u32,
    len: u32,
}

impl RollingChecksum {
    /// Creates an empty checksum with no bytes accumulated.
    #[must_use]
    pub const fn new() -> Self {
        Self { s1: 0, s2: 0, len: 0 }
    }

    /// Computes the rolling checksum over `buf` from scratch.
    ///
    /// This is the non-incremental entry point used by the generator when
    /// building a block set and by the matcher when it needs to reseed the
    /// window after a match (the window jumps forward by the matched
    /// block's length rather than sliding byte by byte).
    #[must_use]
    pub fn of(buf: &[u8]) -> Self {
        let mut s1: u32 = 0;
        let mut s2: u32 = 0;
        for &byte in buf {
            s1 = (s1 + u32::from(byte)) & 0xffff;
            s2 = (s2 + s1) & 0xffff;
        }
        Self {
            s1,
            s2,
            len: buf.len() as u32,
        }
    }

    /// Packs the current state into the wire-format 32-bit fast checksum.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.s1 | (self.s2 << 16)
    }

    /// Number of bytes currently represented by this checksum's window.
    #[must_use]
    pub const fn len(self) -> u32 {
        self.len
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.len == 0
    }

    /// Rolls the window forward by one byte: `old` leaves at the head,
    /// `new` is appended at the tail. The window length is unchanged.
    ///
    /// This is the O(1) update the matcher relies on to slide byte-by-byte
    /// without recomputing the checksum over the whole window.
    pub fn roll(&mut self, old: u8, new: u8) {
        let len = self.len;
        let old = u32::from(old);
        let new = u32::from(new);
        let new_s1 = (self.s1.wrapping_sub(old).wrapping_add(new)) & 0xffff;
        let new_s2 = (self
            .s2
            .wrapping_add(self.s1)
            .wrapping_sub((len + 1).wrapping_mul(old))
            .wrapping_add(new))
            & 0xffff;
        self.s1 = new_s1;
        self.s2 = new_s2;
    }
}

/// Convenience free function mirroring the C API's `hash_fast(buf, len)`.
#[must_use]
pub fn hash_fast(buf: &[u8]) -> u32 {
    RollingChecksum::of(buf).value()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_fresh_computation_after_single_roll() {
        let window = b"abcdefgh";
        for n in 1..window.len() {
            let mut rolling = RollingChecksum::of(&window[..n]);
            for start in 1..=(window.len() - n) {
                rolling.roll(window[start - 1], window[start + n - 1]);
                let fresh = RollingChecksum::of(&window[start..start + n]);
                assert_eq!(rolling.value(), fresh.value(), "n={n} start={start}");
            }
        }
    }

    #[test]
    fn empty_buffer_is_zero() {
        assert_eq!(hash_fast(b""), 0);
    }

    #[test]
    fn single_byte_packs_into_low_half() {
        let cs = RollingChecksum::of(&[5]);
        assert_eq!(cs.value(), 5 | (5 << 16));
    }

    proptest::proptest! {
        #[test]
        fn incremental_equals_fresh(data in proptest::collection::vec(proptest::prelude::any::<u8>(), 1..256), window_len in 1usize..32) {
            let window_len = window_len.min(data.len());
            if window_len == 0 {
                return Ok(());
            }
            let mut rolling = RollingChecksum::of(&data[..window_len]);
            for start in 1..=(data.len() - window_len) {
                rolling.roll(data[start - 1], data[start + window_len - 1]);
                let fresh = RollingChecksum::of(&data[start..start + window_len]);
                proptest::prop_assert_eq!(rolling.value(), fresh.value());
            }
        }
    }
}
