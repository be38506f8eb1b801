//! Named vector operations.
//!
//! The block-oriented strategies are written once, generically, against
//! two small traits:
//!
//! - [`WideLanes`] covers one 32-byte block: unaligned load, zero-extending
//!   widen to 16-bit lanes, lanewise and horizontal adds, lane extraction,
//!   multiply-accumulate into 32-bit lanes, byte equality masks.
//! - [`NeedleSearch`] covers one 16-byte window: find the first byte that is
//!   either delimiter.
//!
//! Implementations are capability tokens. [`Portable`] is always available
//! and emulates the x86 lane layout exactly, so it is the authoritative
//! fallback for every kernel. [`Avx2`] and [`Sse42`] can only be obtained
//! from their `detect()` constructors, which succeed only when the running
//! CPU supports the instructions; holding a token is the proof that calling
//! its operations is sound.
//!
//! Lane layout follows x86: a 256-bit register is two independent 128-bit
//! halves, and `widen`/`hadd_words` operate within each half.

mod portable;
#[cfg(target_arch = "x86_64")]
mod x86;

#[cfg(feature = "std")]
use core::sync::atomic::{AtomicU8, Ordering};

pub use portable::Portable;
#[cfg(target_arch = "x86_64")]
pub use x86::{Avx2, Sse42};

/// Bytes per [`WideLanes`] block.
pub const BLOCK: usize = 32;

/// Bytes per [`NeedleSearch`] window.
pub const WINDOW: usize = 16;

/// Which implementation of the named operations a strategy runs on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Backend {
    /// The widest instruction set the running CPU supports, falling back to
    /// [`Portable`] when none is available.
    #[default]
    Native,
    /// Always use the [`Portable`] emulation.
    Portable,
}

/// Operations on one 32-byte block viewed as 8-, 16- and 32-bit lanes.
pub trait WideLanes: Copy {
    /// 32 lanes of `u8`.
    type Bytes: Copy;
    /// 16 lanes of `u16`.
    type Words: Copy;
    /// 8 lanes of `u32`.
    type Dwords: Copy;

    /// Load a block (no alignment requirement).
    fn load(self, block: &[u8; BLOCK]) -> Self::Bytes;

    /// Zero-extend bytes to 16-bit lanes.
    ///
    /// Returns `(low, high)` in unpack order: `low` holds bytes `0..8` and
    /// `16..24`, `high` holds bytes `8..16` and `24..32`.
    fn widen(self, v: Self::Bytes) -> (Self::Words, Self::Words);

    /// Lanewise wrapping add.
    fn add_words(self, a: Self::Words, b: Self::Words) -> Self::Words;

    /// Horizontal pairwise add of `v` with itself within each 128-bit half.
    ///
    /// Three applications leave every lane of a half holding that half's
    /// total.
    fn hadd_words(self, v: Self::Words) -> Self::Words;

    /// Read one 16-bit lane (`lane < 16`).
    fn extract_word(self, v: Self::Words, lane: usize) -> u16;

    /// All-zero 32-bit lanes.
    fn zero_dwords(self) -> Self::Dwords;

    /// Multiply-accumulate against an all-ones vector: lane `i` of the
    /// result is `v[2i] + v[2i + 1]`.
    fn madd_ones(self, v: Self::Words) -> Self::Dwords;

    /// Lanewise wrapping add.
    fn add_dwords(self, a: Self::Dwords, b: Self::Dwords) -> Self::Dwords;

    /// Fold all eight lanes into one wrapping sum.
    fn fold_dwords(self, v: Self::Dwords) -> u32;

    /// Broadcast `byte` to every lane.
    fn splat(self, byte: u8) -> Self::Bytes;

    /// Lanewise equality; matching lanes become `0xff`, others `0`.
    fn cmpeq(self, a: Self::Bytes, b: Self::Bytes) -> Self::Bytes;

    /// Bitwise or.
    fn or(self, a: Self::Bytes, b: Self::Bytes) -> Self::Bytes;

    /// Reinterpret the block as eight 32-bit words; word `i` covers bytes
    /// `4i..4i + 4`.
    fn mask_words(self, v: Self::Bytes) -> [u32; 8];
}

/// Windowed search for the first delimiter byte.
pub trait NeedleSearch: Copy {
    /// Offset of the first `SOH` or `=` in `window`, or `None` when the
    /// window holds neither.
    fn find_delimiter(self, window: &[u8; WINDOW]) -> Option<usize>;
}

/// Instruction set support relevant to the kernels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Features {
    /// 256-bit integer vectors.
    pub avx2: bool,
    /// Packed string compares.
    pub sse42: bool,
}

#[cfg(feature = "std")]
static FEATURES: AtomicU8 = AtomicU8::new(0);

#[cfg(feature = "std")]
const CHECKED: u8 = 0b100;
#[cfg(feature = "std")]
const AVX2: u8 = 0b001;
#[cfg(feature = "std")]
const SSE42: u8 = 0b010;

impl Features {
    /// Features of the running CPU.
    ///
    /// With `std` this is runtime detection, cached after the first call.
    /// Without it only features enabled at compile time are reported.
    #[must_use]
    pub fn get() -> Self {
        #[cfg(feature = "std")]
        {
            let mut bits = FEATURES.load(Ordering::Relaxed);
            if bits & CHECKED == 0 {
                bits = Self::detect_bits();
                FEATURES.store(bits, Ordering::Relaxed);
            }
            Self {
                avx2: bits & AVX2 != 0,
                sse42: bits & SSE42 != 0,
            }
        }

        #[cfg(not(feature = "std"))]
        {
            Self {
                avx2: cfg!(all(target_arch = "x86_64", target_feature = "avx2")),
                sse42: cfg!(all(target_arch = "x86_64", target_feature = "sse4.2")),
            }
        }
    }

    #[cfg(feature = "std")]
    fn detect_bits() -> u8 {
        #[allow(unused_mut)]
        let mut bits = CHECKED;

        #[cfg(target_arch = "x86_64")]
        {
            if std::is_x86_feature_detected!("avx2") {
                bits |= AVX2;
            }
            if std::is_x86_feature_detected!("sse4.2") {
                bits |= SSE42;
            }
        }

        bits
    }
}
