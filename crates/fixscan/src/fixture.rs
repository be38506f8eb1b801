use alloc::{boxed::Box, vec::Vec};
use core::fmt;

use bstr::ByteSlice;

use crate::sentinel::{NUL, SOH};

/// The reference benchmark message, NUL-terminated.
///
/// A market data incremental refresh (`35=X`) with a space after every
/// field separator.
pub const CANONICAL_MESSAGE: &[u8] = b"1128=9\x01 9=166\x01 35=X\x01 49=ABC\x01 34=6190018\x01 \
52=20100607144854295\x01 75=20100607\x01 268=1\x01 279=0\x01 22=8\x01 48=6640\x01 \
83=3917925\x01 107=ASDF\x01 269=2\x01 270=106425\x01 271=1\x01 273=144854000\x01 \
451=-175\x01 1020=959598\x01 5797=2\x01 10=168\x01\0";

/// Checksum of [`CANONICAL_MESSAGE`] up to its terminator.
pub const CANONICAL_CHECKSUM: usize = 98;

/// Delimiter count of [`CANONICAL_MESSAGE`] up to its terminator: 21 field
/// separators and 21 tag/value separators.
pub const CANONICAL_DELIMITERS: usize = 42;

/// Character standing in for `SOH` in the display form of a message.
const DISPLAY_SOH: u8 = b'|';

/// An immutable message handed to strategies and the harness.
#[derive(Clone, PartialEq, Eq)]
pub struct Fixture {
    bytes: Box<[u8]>,
}

impl Fixture {
    /// Wrap the given bytes verbatim.
    pub fn new(bytes: impl Into<Box<[u8]>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// [`CANONICAL_MESSAGE`] without its terminator.
    #[must_use]
    pub fn canonical() -> Self {
        Self::from_nul_terminated(CANONICAL_MESSAGE)
    }

    /// Take bytes up to, not including, the first NUL. Without a NUL the
    /// whole input is taken.
    #[must_use]
    pub fn from_nul_terminated(bytes: &[u8]) -> Self {
        let end = bytes.find_byte(NUL).unwrap_or(bytes.len());
        Self::new(&bytes[..end])
    }

    /// Parse the human form of a message, where `|` stands for `SOH`.
    #[must_use]
    pub fn from_display(text: &str) -> Self {
        let bytes: Vec<u8> = text.as_bytes().replace([DISPLAY_SOH], [SOH]);
        Self::new(bytes)
    }

    /// The message bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Message length in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the message has no bytes.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Renders `SOH` as `|` and other bytes lossily as UTF-8.
impl fmt::Display for Fixture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = self.bytes.replace([SOH], [DISPLAY_SOH]);
        fmt::Display::fmt(shown.as_bstr(), f)
    }
}

impl fmt::Debug for Fixture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Fixture").field(&self.bytes.as_bstr()).finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;
    use crate::{checksum, delimiters};

    #[test]
    fn canonical_stops_at_terminator() {
        let fixture = Fixture::canonical();
        assert_eq!(fixture.len(), CANONICAL_MESSAGE.len() - 1);
        assert_eq!(fixture.len(), 206);
        assert!(fixture.as_bytes().ends_with(b"10=168\x01"));
    }

    #[test]
    fn canonical_regression_values() {
        let fixture = Fixture::canonical();
        assert_eq!(checksum::reference(fixture.as_bytes()), CANONICAL_CHECKSUM);
        let counts = delimiters::count(fixture.as_bytes());
        assert_eq!((counts.soh, counts.eq), (21, 21));
        assert_eq!(counts.total(), CANONICAL_DELIMITERS);
    }

    #[test]
    fn nul_terminated_without_terminator_takes_everything() {
        assert_eq!(Fixture::from_nul_terminated(b"35=0").as_bytes(), b"35=0");
        assert!(Fixture::from_nul_terminated(b"\0tail").is_empty());
    }

    #[test]
    fn display_form_round_trips() {
        let fixture = Fixture::from_display("8=FIX.4.4|35=0|");
        assert_eq!(fixture.as_bytes(), b"8=FIX.4.4\x0135=0\x01");
        assert_eq!(fixture.to_string(), "8=FIX.4.4|35=0|");
    }
}
