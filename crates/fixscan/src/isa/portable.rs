use super::{BLOCK, NeedleSearch, WINDOW, WideLanes};
use crate::sentinel::is_delimiter;

const HALF_WORDS: usize = 8;

/// Lane-exact emulation of the vector operations on plain arrays.
#[derive(Debug, Clone, Copy, Default)]
pub struct Portable;

impl WideLanes for Portable {
    type Bytes = [u8; BLOCK];
    type Words = [u16; 16];
    type Dwords = [u32; 8];

    #[inline(always)]
    fn load(self, block: &[u8; BLOCK]) -> Self::Bytes {
        *block
    }

    #[inline(always)]
    fn widen(self, v: Self::Bytes) -> (Self::Words, Self::Words) {
        let mut low = [0u16; 16];
        let mut high = [0u16; 16];
        for half in 0..2 {
            let src = half * 16;
            let dst = half * HALF_WORDS;
            for i in 0..HALF_WORDS {
                low[dst + i] = u16::from(v[src + i]);
                high[dst + i] = u16::from(v[src + HALF_WORDS + i]);
            }
        }
        (low, high)
    }

    #[inline(always)]
    fn add_words(self, a: Self::Words, b: Self::Words) -> Self::Words {
        core::array::from_fn(|i| a[i].wrapping_add(b[i]))
    }

    #[inline(always)]
    fn hadd_words(self, v: Self::Words) -> Self::Words {
        let mut out = [0u16; 16];
        for half in 0..2 {
            let base = half * HALF_WORDS;
            for pair in 0..HALF_WORDS / 2 {
                let sum = v[base + 2 * pair].wrapping_add(v[base + 2 * pair + 1]);
                out[base + pair] = sum;
                out[base + HALF_WORDS / 2 + pair] = sum;
            }
        }
        out
    }

    #[inline(always)]
    fn extract_word(self, v: Self::Words, lane: usize) -> u16 {
        v[lane]
    }

    #[inline(always)]
    fn zero_dwords(self) -> Self::Dwords {
        [0; 8]
    }

    #[inline(always)]
    fn madd_ones(self, v: Self::Words) -> Self::Dwords {
        core::array::from_fn(|i| u32::from(v[2 * i]) + u32::from(v[2 * i + 1]))
    }

    #[inline(always)]
    fn add_dwords(self, a: Self::Dwords, b: Self::Dwords) -> Self::Dwords {
        core::array::from_fn(|i| a[i].wrapping_add(b[i]))
    }

    #[inline(always)]
    fn fold_dwords(self, v: Self::Dwords) -> u32 {
        v.iter().fold(0u32, |acc, &lane| acc.wrapping_add(lane))
    }

    #[inline(always)]
    fn splat(self, byte: u8) -> Self::Bytes {
        [byte; BLOCK]
    }

    #[inline(always)]
    fn cmpeq(self, a: Self::Bytes, b: Self::Bytes) -> Self::Bytes {
        core::array::from_fn(|i| if a[i] == b[i] { 0xff } else { 0 })
    }

    #[inline(always)]
    fn or(self, a: Self::Bytes, b: Self::Bytes) -> Self::Bytes {
        core::array::from_fn(|i| a[i] | b[i])
    }

    #[inline(always)]
    fn mask_words(self, v: Self::Bytes) -> [u32; 8] {
        core::array::from_fn(|i| u32::from_ne_bytes([v[4 * i], v[4 * i + 1], v[4 * i + 2], v[4 * i + 3]]))
    }
}

impl NeedleSearch for Portable {
    #[inline(always)]
    fn find_delimiter(self, window: &[u8; WINDOW]) -> Option<usize> {
        window.iter().position(|&byte| is_delimiter(byte))
    }
}
