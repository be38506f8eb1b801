use core::arch::x86_64::{
    __m128i, __m256i, _SIDD_CMP_EQUAL_ANY, _SIDD_LEAST_SIGNIFICANT, _SIDD_UBYTE_OPS, _mm_cmpestri,
    _mm_loadu_si128, _mm256_add_epi16, _mm256_add_epi32, _mm256_cmpeq_epi8, _mm256_hadd_epi16,
    _mm256_loadu_si256, _mm256_madd_epi16, _mm256_or_si256, _mm256_set1_epi8, _mm256_set1_epi16,
    _mm256_setzero_si256, _mm256_srli_si256, _mm256_unpackhi_epi8, _mm256_unpacklo_epi8,
};

use super::{BLOCK, Features, NeedleSearch, WINDOW, WideLanes};
use crate::sentinel::{EQUALS, SOH};

/// 256-bit integer operations. Only constructible on CPUs with AVX2.
#[derive(Debug, Clone, Copy)]
pub struct Avx2 {
    _detected: (),
}

impl Avx2 {
    /// A token when the running CPU supports AVX2.
    #[must_use]
    pub fn detect() -> Option<Self> {
        Features::get().avx2.then_some(Self { _detected: () })
    }
}

// SAFETY (all methods below): an `Avx2` value exists only after `detect`
// confirmed AVX2 support, and every pointer read stays inside a borrowed
// 32-byte array.
impl WideLanes for Avx2 {
    type Bytes = __m256i;
    type Words = __m256i;
    type Dwords = __m256i;

    #[inline(always)]
    fn load(self, block: &[u8; BLOCK]) -> __m256i {
        unsafe { _mm256_loadu_si256(block.as_ptr().cast::<__m256i>()) }
    }

    #[inline(always)]
    fn widen(self, v: __m256i) -> (__m256i, __m256i) {
        unsafe {
            let zero = _mm256_setzero_si256();
            (_mm256_unpacklo_epi8(v, zero), _mm256_unpackhi_epi8(v, zero))
        }
    }

    #[inline(always)]
    fn add_words(self, a: __m256i, b: __m256i) -> __m256i {
        unsafe { _mm256_add_epi16(a, b) }
    }

    #[inline(always)]
    fn hadd_words(self, v: __m256i) -> __m256i {
        unsafe { _mm256_hadd_epi16(v, v) }
    }

    #[inline(always)]
    fn extract_word(self, v: __m256i, lane: usize) -> u16 {
        let lanes: [u16; 16] = unsafe { core::mem::transmute(v) };
        lanes[lane]
    }

    #[inline(always)]
    fn zero_dwords(self) -> __m256i {
        unsafe { _mm256_setzero_si256() }
    }

    #[inline(always)]
    fn madd_ones(self, v: __m256i) -> __m256i {
        unsafe { _mm256_madd_epi16(v, _mm256_set1_epi16(1)) }
    }

    #[inline(always)]
    fn add_dwords(self, a: __m256i, b: __m256i) -> __m256i {
        unsafe { _mm256_add_epi32(a, b) }
    }

    #[inline(always)]
    fn fold_dwords(self, v: __m256i) -> u32 {
        // Byte shifts stay within each 128-bit half, leaving the half totals
        // in lanes 0 and 4.
        let folded = unsafe {
            let v = _mm256_add_epi32(v, _mm256_srli_si256::<4>(v));
            _mm256_add_epi32(v, _mm256_srli_si256::<8>(v))
        };
        let lanes: [u32; 8] = unsafe { core::mem::transmute(folded) };
        lanes[0].wrapping_add(lanes[4])
    }

    #[inline(always)]
    fn splat(self, byte: u8) -> __m256i {
        unsafe { _mm256_set1_epi8(i8::from_ne_bytes([byte])) }
    }

    #[inline(always)]
    fn cmpeq(self, a: __m256i, b: __m256i) -> __m256i {
        unsafe { _mm256_cmpeq_epi8(a, b) }
    }

    #[inline(always)]
    fn or(self, a: __m256i, b: __m256i) -> __m256i {
        unsafe { _mm256_or_si256(a, b) }
    }

    #[inline(always)]
    fn mask_words(self, v: __m256i) -> [u32; 8] {
        unsafe { core::mem::transmute(v) }
    }
}

/// Packed string compare. Only constructible on CPUs with SSE4.2.
#[derive(Debug, Clone, Copy)]
pub struct Sse42 {
    _detected: (),
}

impl Sse42 {
    /// A token when the running CPU supports SSE4.2.
    #[must_use]
    pub fn detect() -> Option<Self> {
        Features::get().sse42.then_some(Self { _detected: () })
    }
}

const NEEDLES: [u8; WINDOW] = [SOH, EQUALS, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
const NEEDLE_LEN: i32 = 2;
const WINDOW_LEN: i32 = 16;
const MODE: i32 = _SIDD_UBYTE_OPS | _SIDD_CMP_EQUAL_ANY | _SIDD_LEAST_SIGNIFICANT;

impl NeedleSearch for Sse42 {
    /// Uses the explicit-length compare so a NUL inside the window does not
    /// end the search early.
    #[inline(always)]
    fn find_delimiter(self, window: &[u8; WINDOW]) -> Option<usize> {
        // SAFETY: `Sse42` exists only after `detect` confirmed SSE4.2, and
        // both loads read exactly one borrowed 16-byte array.
        let index = unsafe {
            let needles = _mm_loadu_si128(NEEDLES.as_ptr().cast::<__m128i>());
            let haystack = _mm_loadu_si128(window.as_ptr().cast::<__m128i>());
            _mm_cmpestri::<MODE>(needles, NEEDLE_LEN, haystack, WINDOW_LEN)
        };
        usize::try_from(index).ok().filter(|&i| i < WINDOW)
    }
}
