//! Shared configuration for domain property tests.

use proptest::test_runner::Config;

/// Proptest configuration used by all domain property suites.
pub fn proptest_config() -> Config {
    Config {
        cases: 256,
        ..Config::default()
    }
}
