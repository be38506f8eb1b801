//! Delimiter counting: the number of `SOH` bytes plus the number of `=`
//! bytes in a message.
//!
//! [`scalar`], [`unrolled`], [`string_search`] and [`hybrid`] return the raw
//! count. [`bitmask`] returns the count modulo 256; see
//! [`Reduction`](crate::Reduction).

#[cfg(target_arch = "x86_64")]
use crate::isa::{Avx2, Sse42};
use crate::{
    isa::{BLOCK, NeedleSearch, Portable, WINDOW, WideLanes},
    sentinel::{Counts, EQUALS, SOH},
};

/// Bytes handled per iteration of [`unrolled`].
pub const STRIDE: usize = 16;

/// The two tallies kept by the reference scan.
#[inline]
#[must_use]
pub fn count(message: &[u8]) -> Counts {
    let mut counts = Counts::default();
    counts.tally_all(message);
    counts
}

/// Single pass, one comparison pair per byte. Every other strategy must
/// agree with it.
#[inline]
#[must_use]
pub fn scalar(message: &[u8]) -> usize {
    count(message).total()
}

macro_rules! tally_offsets {
    ($counts:ident, $block:ident; $($offset:literal)*) => {
        $( $counts.tally($block[$offset]); )*
    };
}

/// The reference loop unrolled by hand into [`STRIDE`]-byte steps.
///
/// Same result as [`scalar`]; it only exists to compare manual unrolling
/// against whatever the compiler does on its own.
#[inline]
#[must_use]
pub fn unrolled(message: &[u8]) -> usize {
    let mut counts = Counts::default();
    let mut rest = message;
    while let Some((block, tail)) = rest.split_first_chunk::<STRIDE>() {
        tally_offsets!(counts, block; 0 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15);
        rest = tail;
    }
    counts.tally_all(rest);
    counts.total()
}

/// Match-by-match windowed search on the best available backend.
///
/// See [`string_search_with`].
#[inline]
#[must_use]
pub fn string_search(message: &[u8]) -> usize {
    #[cfg(target_arch = "x86_64")]
    {
        if let Some(sse42) = Sse42::detect() {
            // SAFETY: the token proves SSE4.2 is available.
            return unsafe { string_search_sse42(sse42, message) };
        }
    }
    string_search_with(Portable, message)
}

/// Match-by-match windowed search.
///
/// Each 16-byte window is searched for its first delimiter. On a hit the
/// delimiter is tallied and the next window starts one byte past it, so
/// adjacent delimiters are each found in turn. On a miss the scan advances
/// a whole window. Fewer than 16 trailing bytes are scanned one at a time.
#[inline(always)]
#[must_use]
pub fn string_search_with<S: NeedleSearch>(search: S, message: &[u8]) -> usize {
    let mut counts = Counts::default();
    let mut pos = 0;
    while let Some(window) = message.get(pos..).and_then(<[u8]>::first_chunk::<WINDOW>) {
        match search.find_delimiter(window) {
            Some(offset) => {
                counts.tally(window[offset]);
                pos += offset + 1;
            }
            None => pos += WINDOW,
        }
    }
    counts.tally_all(message.get(pos..).unwrap_or_default());
    counts.total()
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "sse4.2")]
unsafe fn string_search_sse42(search: Sse42, message: &[u8]) -> usize {
    string_search_with(search, message)
}

/// Window-at-a-time search on the best available backend.
///
/// See [`hybrid_with`].
#[inline]
#[must_use]
pub fn hybrid(message: &[u8]) -> usize {
    #[cfg(target_arch = "x86_64")]
    {
        if let Some(sse42) = Sse42::detect() {
            // SAFETY: the token proves SSE4.2 is available.
            return unsafe { hybrid_sse42(sse42, message) };
        }
    }
    hybrid_with(Portable, message)
}

/// Window-at-a-time search.
///
/// The windowed search only decides whether a 16-byte window holds any
/// delimiter. On a hit the rest of the window, from the first match to its
/// end, is classified byte by byte, and the scan then moves on a whole
/// window. One search instruction is paid per window instead of per match.
#[inline(always)]
#[must_use]
pub fn hybrid_with<S: NeedleSearch>(search: S, message: &[u8]) -> usize {
    let mut counts = Counts::default();
    let mut rest = message;
    while let Some((window, tail)) = rest.split_first_chunk::<WINDOW>() {
        if let Some(offset) = search.find_delimiter(window) {
            counts.tally_all(&window[offset..]);
        }
        rest = tail;
    }
    counts.tally_all(rest);
    counts.total()
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "sse4.2")]
unsafe fn hybrid_sse42(search: Sse42, message: &[u8]) -> usize {
    hybrid_with(search, message)
}

/// Equality-bitmask scan on the best available backend.
///
/// See [`bitmask_with`].
#[inline]
#[must_use]
pub fn bitmask(message: &[u8]) -> usize {
    #[cfg(target_arch = "x86_64")]
    {
        if let Some(avx2) = Avx2::detect() {
            // SAFETY: the token proves AVX2 is available.
            return unsafe { bitmask_avx2(avx2, message) };
        }
    }
    bitmask_with(Portable, message)
}

/// Equality-bitmask scan, returning the count modulo 256.
///
/// Each 32-byte block is compared against both delimiters and the two masks
/// are or-ed together. The combined mask is read as eight 32-bit words; only
/// the four source bytes behind a non-zero word are classified. The final
/// partial block is scanned one byte at a time.
#[inline(always)]
#[must_use]
pub fn bitmask_with<V: WideLanes>(lanes: V, message: &[u8]) -> usize {
    let soh = lanes.splat(SOH);
    let eq = lanes.splat(EQUALS);
    let mut counts = Counts::default();
    let mut rest = message;
    while let Some((block, tail)) = rest.split_first_chunk::<BLOCK>() {
        let v = lanes.load(block);
        let mask = lanes.or(lanes.cmpeq(v, soh), lanes.cmpeq(v, eq));
        for (word, bytes) in lanes.mask_words(mask).into_iter().zip(block.chunks_exact(4)) {
            if word != 0 {
                counts.tally_all(bytes);
            }
        }
        rest = tail;
    }
    counts.tally_all(rest);
    counts.total() % 256
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
unsafe fn bitmask_avx2(lanes: Avx2, message: &[u8]) -> usize {
    bitmask_with(lanes, message)
}
