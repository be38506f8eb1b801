use alloc::string::{String, ToString};

use thiserror::Error;

/// A strategy name that matches no built-in strategy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown strategy `{name}`")]
pub struct ParseStrategyError {
    name: String,
}

impl ParseStrategyError {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    /// The rejected name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Failures surfaced by the benchmark harness.
///
/// Strategies themselves cannot fail; these describe rejected harness input,
/// an unusable clock, or a strategy that disagrees with its reference.
#[cfg(feature = "std")]
#[derive(Error, Debug)]
pub enum HarnessError {
    /// The benchmark message has no bytes.
    #[error("benchmark message is empty")]
    EmptyMessage,
    /// Zero repetitions were requested.
    #[error("run count must be at least 1")]
    ZeroRuns,
    /// The process CPU clock could not be read.
    #[error("process CPU clock unavailable")]
    Clock(#[from] std::io::Error),
    /// A strategy disagreed with the reference for its statistic.
    #[error("{strategy} returned {actual}, reference expects {expected}")]
    Divergence {
        /// Name of the offending strategy.
        strategy: &'static str,
        /// Reduced reference result.
        expected: usize,
        /// What the strategy returned.
        actual: usize,
    },
    /// A strategy returned different results for the same message.
    #[error("{strategy} is not pure: returned {first} then {second}")]
    Unstable {
        /// Name of the offending strategy.
        strategy: &'static str,
        /// Result of the first call.
        first: usize,
        /// Result of the second call.
        second: usize,
    },
}
