use core::{fmt, str::FromStr};

use crate::{
    checksum, delimiters,
    error::ParseStrategyError,
    isa::{Backend, Portable},
};

/// The uniform shape of every strategy: a pure function of the message.
pub type ScanFn = fn(&[u8]) -> usize;

/// The quantity a strategy computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Statistic {
    /// Sum of all bytes modulo 256.
    Checksum,
    /// Number of `SOH` bytes plus number of `=` bytes.
    Delimiters,
}

impl Statistic {
    /// Compute this statistic with its reference strategy.
    #[must_use]
    pub fn reference(self, message: &[u8]) -> usize {
        match self {
            Statistic::Checksum => checksum::reference(message),
            Statistic::Delimiters => delimiters::scalar(message),
        }
    }

    /// All strategies computing this statistic.
    #[must_use]
    pub fn strategies(self) -> &'static [Strategy] {
        match self {
            Statistic::Checksum => &CATALOGUE[..3],
            Statistic::Delimiters => &CATALOGUE[3..],
        }
    }
}

static CATALOGUE: [Strategy; 8] = Strategy::ALL;

/// How a strategy's result relates to the unreduced statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Reduction {
    /// The statistic itself.
    None,
    /// The statistic modulo 256.
    Mod256,
}

impl Reduction {
    /// Reduce an unreduced statistic the way a strategy with this policy
    /// would.
    #[inline]
    #[must_use]
    pub const fn apply(self, value: usize) -> usize {
        match self {
            Reduction::None => value,
            Reduction::Mod256 => value % 256,
        }
    }
}

/// A named, pure, interchangeable implementation of a [`Statistic`].
///
/// Implementations must return the same value for the same message on every
/// call, must not touch shared state, and must equal
/// `self.reduction().apply(self.statistic().reference(message))`.
pub trait Scan {
    /// Stable display name.
    fn name(&self) -> &'static str;

    /// What is computed.
    fn statistic(&self) -> Statistic;

    /// Reduction applied to the result.
    fn reduction(&self) -> Reduction {
        Reduction::None
    }

    /// The function implementing this strategy on `backend`.
    fn function(&self, backend: Backend) -> ScanFn;

    /// Run on the native backend.
    fn scan(&self, message: &[u8]) -> usize {
        (self.function(Backend::Native))(message)
    }
}

/// Checksum strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ChecksumStrategy {
    /// [`checksum::reference`].
    Reference,
    /// [`checksum::pairwise`].
    Pairwise,
    /// [`checksum::parallel_lanes`].
    ParallelLanes,
}

impl Scan for ChecksumStrategy {
    fn name(&self) -> &'static str {
        match self {
            ChecksumStrategy::Reference => "checksum/reference",
            ChecksumStrategy::Pairwise => "checksum/pairwise",
            ChecksumStrategy::ParallelLanes => "checksum/parallel-lanes",
        }
    }

    fn statistic(&self) -> Statistic {
        Statistic::Checksum
    }

    fn reduction(&self) -> Reduction {
        Reduction::Mod256
    }

    fn function(&self, backend: Backend) -> ScanFn {
        match (self, backend) {
            (ChecksumStrategy::Reference, _) => checksum::reference,
            (ChecksumStrategy::Pairwise, Backend::Native) => checksum::pairwise,
            (ChecksumStrategy::Pairwise, Backend::Portable) => {
                |message: &[u8]| checksum::pairwise_with(Portable, message)
            }
            (ChecksumStrategy::ParallelLanes, Backend::Native) => checksum::parallel_lanes,
            (ChecksumStrategy::ParallelLanes, Backend::Portable) => {
                |message: &[u8]| checksum::parallel_lanes_with(Portable, message)
            }
        }
    }
}

/// Delimiter counting strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum DelimiterStrategy {
    /// [`delimiters::scalar`].
    Scalar,
    /// [`delimiters::unrolled`].
    Unrolled,
    /// [`delimiters::string_search`].
    StringSearch,
    /// [`delimiters::hybrid`].
    Hybrid,
    /// [`delimiters::bitmask`]; reduced modulo 256.
    Bitmask,
}

impl Scan for DelimiterStrategy {
    fn name(&self) -> &'static str {
        match self {
            DelimiterStrategy::Scalar => "delimiters/scalar",
            DelimiterStrategy::Unrolled => "delimiters/unrolled",
            DelimiterStrategy::StringSearch => "delimiters/string-search",
            DelimiterStrategy::Hybrid => "delimiters/hybrid",
            DelimiterStrategy::Bitmask => "delimiters/bitmask",
        }
    }

    fn statistic(&self) -> Statistic {
        Statistic::Delimiters
    }

    fn reduction(&self) -> Reduction {
        match self {
            DelimiterStrategy::Bitmask => Reduction::Mod256,
            _ => Reduction::None,
        }
    }

    fn function(&self, backend: Backend) -> ScanFn {
        match (self, backend) {
            (DelimiterStrategy::Scalar, _) => delimiters::scalar,
            (DelimiterStrategy::Unrolled, _) => delimiters::unrolled,
            (DelimiterStrategy::StringSearch, Backend::Native) => delimiters::string_search,
            (DelimiterStrategy::StringSearch, Backend::Portable) => {
                |message: &[u8]| delimiters::string_search_with(Portable, message)
            }
            (DelimiterStrategy::Hybrid, Backend::Native) => delimiters::hybrid,
            (DelimiterStrategy::Hybrid, Backend::Portable) => {
                |message: &[u8]| delimiters::hybrid_with(Portable, message)
            }
            (DelimiterStrategy::Bitmask, Backend::Native) => delimiters::bitmask,
            (DelimiterStrategy::Bitmask, Backend::Portable) => {
                |message: &[u8]| delimiters::bitmask_with(Portable, message)
            }
        }
    }
}

/// Every built-in strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Strategy {
    /// A checksum strategy.
    Checksum(ChecksumStrategy),
    /// A delimiter counting strategy.
    Delimiters(DelimiterStrategy),
}

impl Strategy {
    /// All built-in strategies, checksums first, each group led by its
    /// reference.
    pub const ALL: [Strategy; 8] = [
        Strategy::Checksum(ChecksumStrategy::Reference),
        Strategy::Checksum(ChecksumStrategy::Pairwise),
        Strategy::Checksum(ChecksumStrategy::ParallelLanes),
        Strategy::Delimiters(DelimiterStrategy::Scalar),
        Strategy::Delimiters(DelimiterStrategy::Unrolled),
        Strategy::Delimiters(DelimiterStrategy::StringSearch),
        Strategy::Delimiters(DelimiterStrategy::Hybrid),
        Strategy::Delimiters(DelimiterStrategy::Bitmask),
    ];
}

impl Scan for Strategy {
    fn name(&self) -> &'static str {
        match self {
            Strategy::Checksum(s) => s.name(),
            Strategy::Delimiters(s) => s.name(),
        }
    }

    fn statistic(&self) -> Statistic {
        match self {
            Strategy::Checksum(s) => s.statistic(),
            Strategy::Delimiters(s) => s.statistic(),
        }
    }

    fn reduction(&self) -> Reduction {
        match self {
            Strategy::Checksum(s) => s.reduction(),
            Strategy::Delimiters(s) => s.reduction(),
        }
    }

    fn function(&self, backend: Backend) -> ScanFn {
        match self {
            Strategy::Checksum(s) => s.function(backend),
            Strategy::Delimiters(s) => s.function(backend),
        }
    }
}

impl From<ChecksumStrategy> for Strategy {
    fn from(strategy: ChecksumStrategy) -> Self {
        Strategy::Checksum(strategy)
    }
}

impl From<DelimiterStrategy> for Strategy {
    fn from(strategy: DelimiterStrategy) -> Self {
        Strategy::Delimiters(strategy)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.name() == s)
            .ok_or_else(|| ParseStrategyError::new(s))
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn names_round_trip() {
        for strategy in Strategy::ALL {
            assert_eq!(strategy.to_string().parse::<Strategy>(), Ok(strategy));
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = "delimiters/avx512".parse::<Strategy>().unwrap_err();
        assert_eq!(err.name(), "delimiters/avx512");
        assert_eq!(err.to_string(), "unknown strategy `delimiters/avx512`");
    }

    #[test]
    fn statistic_groups_partition_the_catalogue() {
        for strategy in Statistic::Checksum.strategies() {
            assert_eq!(strategy.statistic(), Statistic::Checksum);
        }
        for strategy in Statistic::Delimiters.strategies() {
            assert_eq!(strategy.statistic(), Statistic::Delimiters);
        }
        assert_eq!(
            Statistic::Checksum.strategies().len() + Statistic::Delimiters.strategies().len(),
            Strategy::ALL.len()
        );
    }

    #[test]
    fn only_bitmask_reduces_delimiter_counts() {
        let reducing: alloc::vec::Vec<_> = Statistic::Delimiters
            .strategies()
            .iter()
            .filter(|s| s.reduction() == Reduction::Mod256)
            .collect();
        assert_eq!(reducing, [&Strategy::Delimiters(DelimiterStrategy::Bitmask)]);
    }
}
