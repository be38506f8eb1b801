//! FIX checksum: the sum of all message bytes modulo 256.
//!
//! Every strategy returns a value in `0..=255`. Sums are carried in 32-bit
//! accumulators with wrapping addition, which preserves the value modulo
//! 256 for any length.

#[cfg(target_arch = "x86_64")]
use crate::isa::Avx2;
use crate::isa::{BLOCK, Portable, WideLanes};

#[inline(always)]
fn sum_bytes(acc: u32, bytes: &[u8]) -> u32 {
    bytes.iter().fold(acc, |acc, &byte| acc.wrapping_add(u32::from(byte)))
}

#[inline(always)]
fn reduce(sum: u32) -> usize {
    usize::from(sum.to_le_bytes()[0])
}

/// Byte-at-a-time reference. Every other strategy must agree with it.
#[inline]
#[must_use]
pub fn reference(message: &[u8]) -> usize {
    reduce(sum_bytes(0, message))
}

/// Per-block horizontal reduction on the best available backend.
///
/// See [`pairwise_with`].
#[inline]
#[must_use]
pub fn pairwise(message: &[u8]) -> usize {
    #[cfg(target_arch = "x86_64")]
    {
        if let Some(avx2) = Avx2::detect() {
            // SAFETY: the token proves AVX2 is available.
            return unsafe { pairwise_avx2(avx2, message) };
        }
    }
    pairwise_with(Portable, message)
}

/// Per-block horizontal reduction.
///
/// Each 32-byte block is widened to 16-bit lanes, its two halves added
/// lanewise, and the result reduced with three horizontal adds to one total
/// per 128-bit half. The block total is added to a scalar running sum. A
/// block sums to at most `32 * 255`, so the 16-bit lanes never wrap and the
/// result is exact for every input. The final partial block is summed a byte
/// at a time.
#[inline(always)]
#[must_use]
pub fn pairwise_with<V: WideLanes>(lanes: V, message: &[u8]) -> usize {
    let mut sum = 0u32;
    let mut rest = message;
    while let Some((block, tail)) = rest.split_first_chunk::<BLOCK>() {
        let (low, high) = lanes.widen(lanes.load(block));
        let mut words = lanes.add_words(low, high);
        words = lanes.hadd_words(words);
        words = lanes.hadd_words(words);
        words = lanes.hadd_words(words);
        sum = sum
            .wrapping_add(u32::from(lanes.extract_word(words, 0)))
            .wrapping_add(u32::from(lanes.extract_word(words, 15)));
        rest = tail;
    }
    reduce(sum_bytes(sum, rest))
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
unsafe fn pairwise_avx2(lanes: Avx2, message: &[u8]) -> usize {
    pairwise_with(lanes, message)
}

/// Lane-parallel accumulation on the best available backend.
///
/// See [`parallel_lanes_with`].
#[inline]
#[must_use]
pub fn parallel_lanes(message: &[u8]) -> usize {
    #[cfg(target_arch = "x86_64")]
    {
        if let Some(avx2) = Avx2::detect() {
            // SAFETY: the token proves AVX2 is available.
            return unsafe { parallel_lanes_avx2(avx2, message) };
        }
    }
    parallel_lanes_with(Portable, message)
}

/// Lane-parallel accumulation.
///
/// Blocks are widened to 16-bit lanes and multiply-accumulated against ones
/// into eight persistent 32-bit lanes; nothing is reduced until the end,
/// when the lanes are folded with shifts and vertical adds.
///
/// The result is only specified for messages whose byte sum fits in a
/// `u32` (anything below roughly 16 MiB). Use [`reference`] or [`pairwise`]
/// for unbounded input.
#[inline(always)]
#[must_use]
pub fn parallel_lanes_with<V: WideLanes>(lanes: V, message: &[u8]) -> usize {
    let mut acc = lanes.zero_dwords();
    let mut rest = message;
    while let Some((block, tail)) = rest.split_first_chunk::<BLOCK>() {
        let (low, high) = lanes.widen(lanes.load(block));
        acc = lanes.add_dwords(acc, lanes.madd_ones(low));
        acc = lanes.add_dwords(acc, lanes.madd_ones(high));
        rest = tail;
    }
    reduce(sum_bytes(lanes.fold_dwords(acc), rest))
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
unsafe fn parallel_lanes_avx2(lanes: Avx2, message: &[u8]) -> usize {
    parallel_lanes_with(lanes, message)
}
