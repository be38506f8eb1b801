//! Command-line arguments for the fixscan benchmark.

use anyhow::bail;
use clap::{Parser, ValueEnum};
use fixscan::{BenchOptions, Fixture, Statistic, Strategy};

/// Benchmark FIX checksum and delimiter scanning strategies
#[derive(Parser, Debug)]
#[command(name = "fixscan")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Invocations of each strategy
    #[arg(short = 'n', long, env = "FIXSCAN_RUNS", default_value_t = BenchOptions::DEFAULT_RUN_COUNT)]
    pub runs: usize,

    /// Strategy to benchmark, e.g. `checksum/pairwise` (repeatable) [default: all]
    #[arg(short, long = "strategy", value_name = "NAME")]
    pub strategies: Vec<Strategy>,

    /// Only benchmark strategies computing this statistic
    #[arg(long, value_enum)]
    pub statistic: Option<StatisticArg>,

    /// Message to scan, with `|` standing for SOH [default: built-in market data message]
    #[arg(short, long, value_name = "TEXT")]
    pub message: Option<String>,

    /// Run vector kernels on the portable emulation instead of native instructions
    #[arg(long)]
    pub portable: bool,

    /// Skip the check against the reference before timing
    #[arg(long)]
    pub no_verify: bool,

    /// Print one JSON object per run instead of the summary line
    #[arg(long)]
    pub json: bool,

    /// List strategy names and exit
    #[arg(long)]
    pub list: bool,
}

/// Statistic selector accepted on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatisticArg {
    /// Sum of all bytes modulo 256
    Checksum,
    /// Count of SOH and `=` bytes
    Delimiters,
}

impl From<StatisticArg> for Statistic {
    fn from(arg: StatisticArg) -> Self {
        match arg {
            StatisticArg::Checksum => Statistic::Checksum,
            StatisticArg::Delimiters => Statistic::Delimiters,
        }
    }
}

impl Cli {
    /// Strategies to run, in catalogue order unless named explicitly.
    pub fn selected(&self) -> Vec<Strategy> {
        let named = if self.strategies.is_empty() {
            Strategy::ALL.to_vec()
        } else {
            self.strategies.clone()
        };
        match self.statistic.map(Statistic::from) {
            Some(statistic) => named
                .into_iter()
                .filter(|strategy| fixscan::Scan::statistic(strategy) == statistic)
                .collect(),
            None => named,
        }
    }

    /// The message to benchmark.
    ///
    /// # Errors
    ///
    /// Fails when `--message` is given but empty.
    pub fn fixture(&self) -> anyhow::Result<Fixture> {
        let fixture = match &self.message {
            Some(text) => Fixture::from_display(text),
            None => Fixture::canonical(),
        };
        if fixture.is_empty() {
            bail!("--message must contain at least one byte");
        }
        Ok(fixture)
    }

    /// Harness configuration derived from the flags.
    pub fn options(&self) -> BenchOptions {
        BenchOptions {
            run_count: self.runs,
            backend: if self.portable {
                fixscan::Backend::Portable
            } else {
                fixscan::Backend::Native
            },
            verify: !self.no_verify,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixscan::{ChecksumStrategy, DelimiterStrategy};

    #[test]
    fn defaults_select_every_strategy() {
        let cli = Cli::try_parse_from(["fixscan"]).unwrap();
        assert_eq!(cli.selected(), Strategy::ALL.to_vec());
        assert_eq!(cli.options().backend, fixscan::Backend::Native);
        assert!(cli.options().verify);
    }

    #[test]
    fn statistic_filters_named_strategies() {
        let cli = Cli::try_parse_from([
            "fixscan",
            "--strategy",
            "checksum/pairwise",
            "--strategy",
            "delimiters/bitmask",
            "--statistic",
            "delimiters",
        ])
        .unwrap();
        assert_eq!(
            cli.selected(),
            vec![Strategy::from(DelimiterStrategy::Bitmask)]
        );
    }

    #[test]
    fn statistic_alone_selects_its_group() {
        let cli = Cli::try_parse_from(["fixscan", "--statistic", "checksum"]).unwrap();
        assert_eq!(
            cli.selected(),
            vec![
                Strategy::from(ChecksumStrategy::Reference),
                Strategy::from(ChecksumStrategy::Pairwise),
                Strategy::from(ChecksumStrategy::ParallelLanes),
            ]
        );
    }

    #[test]
    fn unknown_strategy_is_rejected() {
        let err = Cli::try_parse_from(["fixscan", "-s", "checksum/avx512"]).unwrap_err();
        assert!(err.to_string().contains("unknown strategy `checksum/avx512`"));
    }

    #[test]
    fn message_replaces_canonical_fixture() {
        let cli = Cli::try_parse_from(["fixscan"]).unwrap();
        assert_eq!(cli.fixture().unwrap(), Fixture::canonical());

        let cli = Cli::try_parse_from(["fixscan", "-m", "35=0|"]).unwrap();
        assert_eq!(cli.fixture().unwrap().as_bytes(), b"35=0\x01");
    }

    #[test]
    fn empty_message_is_rejected_up_front() {
        let cli = Cli::try_parse_from(["fixscan", "-m", ""]).unwrap();
        let err = cli.fixture().unwrap_err();
        assert_eq!(err.to_string(), "--message must contain at least one byte");
    }

    #[test]
    fn flags_map_onto_options() {
        let cli = Cli::try_parse_from(["fixscan", "-n", "5", "--portable", "--no-verify"]).unwrap();
        let options = cli.options();
        assert_eq!(options.run_count, 5);
        assert_eq!(options.backend, fixscan::Backend::Portable);
        assert!(!options.verify);
    }
}
