use crate::isa::Backend;

/// Configuration for a benchmark run.
///
/// # Examples
///
/// ```rust
/// use fixscan::{Backend, BenchOptions};
///
/// let options = BenchOptions {
///     run_count: 1_000,
///     backend: Backend::Portable,
///     ..Default::default()
/// };
/// assert!(options.verify);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchOptions {
    /// How many times the strategy is invoked on the message.
    ///
    /// Must be at least 1.
    ///
    /// # Default
    ///
    /// `10_000_000`
    pub run_count: usize,

    /// Which implementation of the vector operations to time.
    ///
    /// # Default
    ///
    /// [`Backend::Native`]
    pub backend: Backend,

    /// Whether to check the strategy against the reference for its statistic
    /// before timing it.
    ///
    /// A failed check aborts the run with
    /// [`HarnessError::Divergence`](crate::HarnessError::Divergence).
    ///
    /// # Default
    ///
    /// `true`
    pub verify: bool,
}

impl BenchOptions {
    /// Repetitions used when none are configured.
    pub const DEFAULT_RUN_COUNT: usize = 10_000_000;
}

impl Default for BenchOptions {
    fn default() -> Self {
        Self {
            run_count: Self::DEFAULT_RUN_COUNT,
            backend: Backend::Native,
            verify: true,
        }
    }
}
