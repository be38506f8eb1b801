#![expect(missing_docs)]

use fixscan::{
    Backend, BenchOptions, CANONICAL_CHECKSUM, CANONICAL_DELIMITERS, Fixture, HarnessError, Scan,
    ScanFn, Statistic, Strategy, harness,
};
use rstest::rstest;

/// Counts only the field separators: a plausible but wrong strategy.
struct SohOnly;

impl Scan for SohOnly {
    fn name(&self) -> &'static str {
        "test/soh-only"
    }

    fn statistic(&self) -> Statistic {
        Statistic::Delimiters
    }

    fn function(&self, _backend: Backend) -> ScanFn {
        |message: &[u8]| fixscan::delimiters::count(message).soh
    }
}

fn quick(backend: Backend) -> BenchOptions {
    BenchOptions {
        run_count: 1_000,
        backend,
        ..Default::default()
    }
}

#[rstest]
fn result_sum_is_runs_times_result(
    #[values(Backend::Native, Backend::Portable)] backend: Backend,
) {
    let fixture = Fixture::canonical();
    for strategy in Strategy::ALL {
        let summary = harness::run_benchmark(&fixture, &strategy, &quick(backend)).unwrap();
        let per_message = match strategy.statistic() {
            Statistic::Checksum => CANONICAL_CHECKSUM,
            Statistic::Delimiters => CANONICAL_DELIMITERS,
        };
        assert_eq!(summary.strategy, strategy.name());
        assert_eq!(summary.messages, 1_000);
        assert_eq!(summary.result_sum, 1_000 * per_message as u64);
    }
}

#[test]
fn verify_returns_agreed_value() {
    let fixture = Fixture::canonical();
    for strategy in Statistic::Checksum.strategies() {
        let value = harness::verify(&fixture, strategy, Backend::Native).unwrap();
        assert_eq!(value, CANONICAL_CHECKSUM);
    }
}

#[test]
fn divergent_strategy_is_reported() {
    let fixture = Fixture::canonical();
    let err = harness::verify(&fixture, &SohOnly, Backend::Native).unwrap_err();
    match err {
        HarnessError::Divergence {
            strategy,
            expected,
            actual,
        } => {
            assert_eq!(strategy, "test/soh-only");
            assert_eq!(expected, CANONICAL_DELIMITERS);
            assert_eq!(actual, 21);
        }
        other => panic!("expected divergence, got {other:?}"),
    }
}

#[test]
fn divergent_strategy_still_runs_unverified() {
    let fixture = Fixture::canonical();
    let options = BenchOptions {
        run_count: 10,
        verify: false,
        ..Default::default()
    };
    let summary = harness::run_benchmark(&fixture, &SohOnly, &options).unwrap();
    assert_eq!(summary.result_sum, 210);
}

#[test]
fn empty_message_is_rejected() {
    let strategy = Strategy::ALL[0];
    let err = harness::run_benchmark(&Fixture::new(Vec::new()), &strategy, &quick(Backend::Native))
        .unwrap_err();
    assert!(matches!(err, HarnessError::EmptyMessage), "{err:?}");
}

#[test]
fn zero_runs_are_rejected() {
    let options = BenchOptions {
        run_count: 0,
        ..Default::default()
    };
    let err = harness::run_benchmark(&Fixture::canonical(), &Strategy::ALL[3], &options).unwrap_err();
    assert!(matches!(err, HarnessError::ZeroRuns), "{err:?}");
}

#[test]
fn trait_objects_are_accepted() {
    let strategies: Vec<Box<dyn Scan>> = vec![Box::new(Strategy::ALL[1]), Box::new(SohOnly)];
    let fixture = Fixture::from_display("8=FIX.4.4|9=5|35=0|10=161|");
    let verified: Vec<bool> = strategies
        .iter()
        .map(|s| harness::verify(&fixture, s.as_ref(), Backend::Portable).is_ok())
        .collect();
    assert_eq!(verified, [true, false]);
}
