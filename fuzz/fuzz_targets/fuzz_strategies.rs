#![no_main]
use arbitrary::Arbitrary;
use fixscan::{Backend, EQUALS, SOH, Scan, Strategy};
use libfuzzer_sys::fuzz_target;

/// Raw bytes plus a knob that rewrites some of them into delimiters, so the
/// fuzzer reaches dense-sentinel windows without having to guess `0x01`.
#[derive(Debug, Arbitrary)]
struct Input {
    density: u8,
    bytes: Vec<u8>,
}

impl Input {
    fn message(&self) -> Vec<u8> {
        self.bytes
            .iter()
            .map(|&byte| match byte {
                b if b < self.density / 2 => SOH,
                b if b < self.density => EQUALS,
                b => b,
            })
            .collect()
    }
}

fn check(input: &Input) {
    let message = input.message();
    for strategy in Strategy::ALL {
        let expected = strategy
            .reduction()
            .apply(strategy.statistic().reference(&message));
        for backend in [Backend::Native, Backend::Portable] {
            let actual = strategy.function(backend)(&message);
            assert_eq!(
                actual,
                expected,
                "{strategy} on {backend:?} disagrees for {} bytes",
                message.len()
            );
        }
    }
}

fuzz_target!(|input: Input| check(&input));
