/// Field separator between adjacent `tag=value` pairs.
pub const SOH: u8 = 0x01;

/// Separator between a field's tag number and its value.
pub const EQUALS: u8 = b'=';

/// Terminator of the NUL-delimited message form.
pub const NUL: u8 = 0x00;

/// Separate tallies of the two delimiter bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    /// Number of [`SOH`] bytes seen.
    pub soh: usize,
    /// Number of [`EQUALS`] bytes seen.
    pub eq: usize,
}

impl Counts {
    /// Combined number of delimiter bytes.
    #[inline]
    #[must_use]
    pub const fn total(self) -> usize {
        self.soh + self.eq
    }

    /// Tally every byte of `bytes`.
    #[inline(always)]
    pub(crate) fn tally_all(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.tally(byte);
        }
    }

    #[inline(always)]
    pub(crate) fn tally(&mut self, byte: u8) {
        match byte {
            EQUALS => self.eq += 1,
            SOH => self.soh += 1,
            _ => {}
        }
    }
}

#[inline(always)]
pub(crate) const fn is_delimiter(byte: u8) -> bool {
    byte == SOH || byte == EQUALS
}
