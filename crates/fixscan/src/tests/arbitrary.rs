use alloc::{boxed::Box, vec::Vec};

use quickcheck::{Arbitrary, Gen};

use crate::sentinel::{EQUALS, NUL, SOH};

/// Longest generated message: several 32-byte blocks plus a tail.
const MAX_LEN: usize = 200;

/// A message biased towards delimiter bytes and NULs so every window and
/// block boundary sees hits, misses and runs of adjacent delimiters.
#[derive(Debug, Clone)]
pub(crate) struct Message(pub Vec<u8>);

impl Arbitrary for Message {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = usize::arbitrary(g) % (MAX_LEN + 1);
        let bytes = (0..len)
            .map(|_| match u8::arbitrary(g) % 8 {
                0 => SOH,
                1 => EQUALS,
                2 => NUL,
                3 => b'0' + u8::arbitrary(g) % 10,
                _ => u8::arbitrary(g),
            })
            .collect();
        Self(bytes)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        Box::new(self.0.shrink().map(Self))
    }
}

/// A message made entirely of high bytes, the worst case for narrow
/// accumulators.
#[derive(Debug, Clone)]
pub(crate) struct HeavyMessage(pub Vec<u8>);

impl Arbitrary for HeavyMessage {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = usize::arbitrary(g) % (MAX_LEN * 4 + 1);
        Self((0..len).map(|_| 0xc0 | u8::arbitrary(g)).collect())
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        Box::new(self.0.shrink().map(Self))
    }
}
