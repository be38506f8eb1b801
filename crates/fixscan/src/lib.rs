//! Byte scanning for FIX tag=value messages.
//!
//! Two statistics are computed over an opaque, fully materialized message:
//!
//! - the FIX checksum, the sum of all bytes modulo 256 ([`checksum`]);
//! - the number of field separators (`SOH`, `0x01`) plus tag/value
//!   separators (`=`) ([`delimiters`]).
//!
//! Each statistic has several interchangeable strategies, from a plain
//! scalar loop up to 256-bit vector kernels. Every strategy is a pure
//! `fn(&[u8]) -> usize`; they are catalogued by [`Strategy`] and must agree
//! with the scalar reference on every input (modulo the documented
//! [`Reduction`] of the bitmask scan).
//!
//! Vector kernels are written once against the named operations in [`isa`]
//! and run either on the native instruction set or on a lane-exact portable
//! emulation, which is always available.
//!
//! With the `std` feature (on by default) the [`harness`] module times
//! strategies against a process CPU clock and cross-checks their results.
//!
//! ```rust
//! use fixscan::{Fixture, Scan, Strategy};
//!
//! let fixture = Fixture::from_display("8=FIX.4.4|35=0|10=123|");
//! for strategy in Strategy::ALL {
//!     let expected = strategy.reduction().apply(strategy.statistic().reference(fixture.as_bytes()));
//!     assert_eq!(strategy.scan(fixture.as_bytes()), expected);
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
extern crate alloc;

#[cfg(all(test, not(feature = "std")))]
extern crate std;

mod error;
mod fixture;
mod sentinel;
mod strategy;

pub mod checksum;
pub mod delimiters;
pub mod isa;

#[cfg(feature = "std")]
pub mod harness;
#[cfg(feature = "std")]
mod options;

#[cfg(test)]
mod tests;

pub use error::ParseStrategyError;
#[cfg(feature = "std")]
pub use error::HarnessError;
pub use fixture::{CANONICAL_CHECKSUM, CANONICAL_DELIMITERS, CANONICAL_MESSAGE, Fixture};
pub use isa::Backend;
#[cfg(feature = "std")]
pub use options::BenchOptions;
pub use sentinel::{Counts, EQUALS, NUL, SOH};
pub use strategy::{ChecksumStrategy, DelimiterStrategy, Reduction, Scan, ScanFn, Statistic, Strategy};
