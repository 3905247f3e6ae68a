#![allow(dead_code)]
//! Shared integration test utilities.
//!
//! Import with:
//! ```ignore
//! mod common;
//! use common::*;
//! ```

use std::sync::Once;

use spyglass::{Generator, GeneratorConfig, SpyingArbitrary, TestConfig, create_seeded_rng, to_arbitrary};
use tracing_subscriber::EnvFilter;

static INIT_LOGGING: Once = Once::new();

/// Seed used by tests that draw fixtures by hand.
pub const DEFAULT_TEST_SEED: u64 = 0x5EED_5EED;

/// Initialize test logging, honouring `RUST_LOG` and defaulting to `debug`.
///
/// Safe to call multiple times; only initializes once.
pub fn init_test_logging() {
    INIT_LOGGING.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_ansi(false)
            .try_init();
    });
}

/// Finalise a fixture and draw one `(log, value)` pair from it.
pub fn draw<L: 'static, A: 'static>(fixture: SpyingArbitrary<L, A>, seed: u64) -> (L, A) {
    let mut rng = create_seeded_rng(seed);
    to_arbitrary(fixture).generate(&mut rng, &GeneratorConfig::default())
}

/// A reproducible configuration for runner-driven tests.
pub fn seeded_config(iterations: usize) -> TestConfig {
    TestConfig::default()
        .iterations(iterations)
        .seed(DEFAULT_TEST_SEED)
}
