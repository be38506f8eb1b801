//! Benchmark and validation harness.
//!
//! [`run_benchmark`] invokes one strategy repeatedly over a fixture and
//! reports CPU time, throughput and the accumulated result sum. The sum
//! keeps the calls observable to the optimizer and doubles as a coarse
//! correctness signal: for a pure strategy it is the run count times the
//! per-message result. [`verify`] compares a strategy directly against the
//! reference for its statistic.
//!
//! Everything runs on the calling thread, one call after another.

mod clock;

use core::{fmt, hint::black_box, time::Duration};

pub use clock::process_cpu_time;
use tracing::{debug, info, warn};

use crate::{BenchOptions, Fixture, HarnessError, Scan, isa::Backend};

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Outcome of one [`run_benchmark`] call.
///
/// With the `serde` feature it serializes as a flat record carrying the
/// elapsed time in nanoseconds and both rates next to the raw fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(into = "SummaryRecord"))]
pub struct Summary {
    /// Name of the strategy that ran.
    pub strategy: &'static str,
    /// Process CPU time spent across all runs.
    pub elapsed: Duration,
    /// Number of messages processed.
    pub messages: usize,
    /// Wrapping sum of every returned value.
    pub result_sum: u64,
}

impl Summary {
    /// Throughput in whole messages per second, truncated. `None` when no
    /// CPU time was observed, which [`Display`](fmt::Display) shows as `inf`.
    #[must_use]
    pub fn messages_per_sec(&self) -> Option<u64> {
        (self.messages as u128 * NANOS_PER_SEC)
            .checked_div(self.elapsed.as_nanos())
            .map(saturate)
    }

    /// Mean CPU time per message in whole nanoseconds, truncated. Zero when
    /// no messages were processed.
    #[must_use]
    pub fn nanos_per_message(&self) -> u64 {
        self.elapsed
            .as_nanos()
            .checked_div(self.messages as u128)
            .map_or(0, saturate)
    }
}

fn saturate(value: u128) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

/// `Elapsed time: 1.250000000, 8000000 msg/sec, 125 nsec/msg. Result sum: 420000000.`
impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Elapsed time: {}.{:09}, ",
            self.elapsed.as_secs(),
            self.elapsed.subsec_nanos()
        )?;
        match self.messages_per_sec() {
            Some(rate) => write!(f, "{rate} msg/sec, ")?,
            None => f.write_str("inf msg/sec, ")?,
        }
        write!(
            f,
            "{} nsec/msg. Result sum: {}.",
            self.nanos_per_message(),
            self.result_sum
        )
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize)]
struct SummaryRecord {
    strategy: &'static str,
    elapsed_ns: u64,
    messages: usize,
    result_sum: u64,
    messages_per_sec: Option<u64>,
    nanos_per_message: u64,
}

#[cfg(feature = "serde")]
impl From<Summary> for SummaryRecord {
    fn from(summary: Summary) -> Self {
        Self {
            strategy: summary.strategy,
            elapsed_ns: saturate(summary.elapsed.as_nanos()),
            messages: summary.messages,
            result_sum: summary.result_sum,
            messages_per_sec: summary.messages_per_sec(),
            nanos_per_message: summary.nanos_per_message(),
        }
    }
}

/// Check `strategy` against the reference for its statistic on `fixture`.
///
/// The strategy is called twice; both results must match each other and
/// the reference reduced by the strategy's [`Reduction`](crate::Reduction).
/// Returns the agreed value.
///
/// # Errors
///
/// [`HarnessError::Unstable`] if the two calls disagree,
/// [`HarnessError::Divergence`] if the result differs from the reference.
pub fn verify<S: Scan + ?Sized>(
    fixture: &Fixture,
    strategy: &S,
    backend: Backend,
) -> Result<usize, HarnessError> {
    let message = fixture.as_bytes();
    let scan = strategy.function(backend);

    let first = scan(message);
    let second = scan(message);
    if first != second {
        warn!(strategy = strategy.name(), first, second, "strategy is not pure");
        return Err(HarnessError::Unstable {
            strategy: strategy.name(),
            first,
            second,
        });
    }

    let expected = strategy.reduction().apply(strategy.statistic().reference(message));
    if first != expected {
        warn!(strategy = strategy.name(), expected, actual = first, "strategy diverged from reference");
        return Err(HarnessError::Divergence {
            strategy: strategy.name(),
            expected,
            actual: first,
        });
    }

    debug!(strategy = strategy.name(), ?backend, result = first, "verified");
    Ok(first)
}

/// Time `options.run_count` invocations of `strategy` on `fixture`.
///
/// # Errors
///
/// [`HarnessError::EmptyMessage`] and [`HarnessError::ZeroRuns`] reject the
/// input before anything runs, verification failures are passed through
/// when `options.verify` is set, and [`HarnessError::Clock`] reports an
/// unreadable CPU clock.
pub fn run_benchmark<S: Scan + ?Sized>(
    fixture: &Fixture,
    strategy: &S,
    options: &BenchOptions,
) -> Result<Summary, HarnessError> {
    if fixture.is_empty() {
        return Err(HarnessError::EmptyMessage);
    }
    if options.run_count == 0 {
        return Err(HarnessError::ZeroRuns);
    }
    if options.verify {
        verify(fixture, strategy, options.backend)?;
    }

    let message = fixture.as_bytes();
    let scan = strategy.function(options.backend);
    debug!(
        strategy = strategy.name(),
        backend = ?options.backend,
        runs = options.run_count,
        bytes = message.len(),
        "starting benchmark"
    );

    let mut result_sum = 0u64;
    let start = process_cpu_time()?;
    for _ in 0..options.run_count {
        let result = scan(black_box(message));
        result_sum = result_sum.wrapping_add(result as u64);
    }
    let end = process_cpu_time()?;

    let summary = Summary {
        strategy: strategy.name(),
        elapsed: end.saturating_sub(start),
        messages: options.run_count,
        result_sum: black_box(result_sum),
    };
    info!(
        strategy = summary.strategy,
        elapsed_ns = saturate(summary.elapsed.as_nanos()),
        messages = summary.messages,
        messages_per_sec = summary.messages_per_sec(),
        nanos_per_message = summary.nanos_per_message(),
        result_sum = summary.result_sum,
        "benchmark finished"
    );
    Ok(summary)
}
