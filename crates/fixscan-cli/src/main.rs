//! fixscan - benchmark FIX byte scanning strategies

mod cli;

use anyhow::{Context, bail};
use clap::Parser;
use fixscan::{HarnessError, Scan, harness, harness::Summary, isa::Features};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::cli::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if cli.list {
        for strategy in fixscan::Strategy::ALL {
            println!("{strategy}");
        }
        return Ok(());
    }

    let features = Features::get();
    tracing::info!(avx2 = features.avx2, sse42 = features.sse42, "Detected CPU features");

    let fixture = cli.fixture()?;
    let options = cli.options();
    let strategies = cli.selected();
    if strategies.is_empty() {
        bail!("no strategy matches the selection");
    }

    let mut failures = 0usize;
    for strategy in &strategies {
        if !cli.json {
            println!("Benchmarking {}...", strategy.name());
        }
        match harness::run_benchmark(&fixture, strategy, &options) {
            Ok(summary) => println!("{}", render(&summary, cli.json)?),
            Err(err @ (HarnessError::Divergence { .. } | HarnessError::Unstable { .. })) => {
                tracing::error!(strategy = strategy.name(), "{err}");
                failures += 1;
            }
            Err(err) => {
                return Err(err).with_context(|| format!("benchmark of {strategy} failed"));
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} strategies failed verification", strategies.len());
    }
    Ok(())
}

/// One output line for a finished run: the summary line, or a JSON object.
fn render(summary: &Summary, json: bool) -> anyhow::Result<String> {
    if json {
        serde_json::to_string(summary).context("failed to encode summary")
    } else {
        Ok(summary.to_string())
    }
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("fixscan=warn"),
        1 => EnvFilter::new("fixscan=info"),
        2 => EnvFilter::new("fixscan=debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn summary() -> Summary {
        Summary {
            strategy: "delimiters/hybrid",
            elapsed: Duration::new(1, 250_000_000),
            messages: 10_000_000,
            result_sum: 420_000_000,
        }
    }

    #[test]
    fn json_carries_both_rates() {
        let line = render(&summary(), true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "strategy": "delimiters/hybrid",
                "elapsed_ns": 1_250_000_000u64,
                "messages": 10_000_000u64,
                "result_sum": 420_000_000u64,
                "messages_per_sec": 8_000_000u64,
                "nanos_per_message": 125u64,
            })
        );
    }

    #[test]
    fn text_and_json_agree_on_rates() {
        let summary = Summary {
            elapsed: Duration::from_nanos(1_565_015),
            messages: 1_000,
            ..summary()
        };
        let text = render(&summary, false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&render(&summary, true).unwrap()).unwrap();
        assert!(text.contains(&format!("{} msg/sec", value["messages_per_sec"])), "{text}");
        assert!(text.contains(&format!("{} nsec/msg", value["nanos_per_message"])), "{text}");
    }

    #[test]
    fn json_reports_unmeasured_rate_as_null() {
        let summary = Summary {
            elapsed: Duration::ZERO,
            ..summary()
        };
        let value: serde_json::Value = serde_json::from_str(&render(&summary, true).unwrap()).unwrap();
        assert!(value["messages_per_sec"].is_null());
        assert_eq!(value["nanos_per_message"], 0);
    }
}
