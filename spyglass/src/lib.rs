#![allow(clippy::result_large_err)]

//! # Spyglass - Randomized Spies for Property-Based Testing
//!
//! Spyglass generates spy implementations of collaborator interfaces: random
//! functions that record every call. Spies and plain generated data compose
//! into a single fixture that yields, on every draw, the value under test and
//! the call logs of every spy inside it.
//!
//! ## Quick Start
//!
//! ```rust
//! use spyglass::{
//!     CallLog, GeneratorConfig, SpyFn, TestConfig, arb_spy_fn_with, check_with_config, field,
//!     ints, record, to_arbitrary, vec_of,
//! };
//!
//! type Render = SpyFn<(i64,), i64, String>;
//!
//! let fixture = record(vec![
//!     field("render", arb_spy_fn_with::<(i64,), _, _>(ints::<i64>(), |x| x.to_string())),
//!     field("inputs", vec_of(ints::<i64>(), 1, 10)),
//! ]);
//!
//! let result = check_with_config(
//!     to_arbitrary(fixture),
//!     |(log, value): (spyglass::Record, spyglass::Record)| {
//!         let render = value.field::<Render>("render").unwrap();
//!         let inputs = value.field::<Vec<i64>>("inputs").unwrap();
//!         let rendered: Vec<String> = inputs.iter().map(|x| render.call((*x,))).collect();
//!
//!         let calls = log.field::<CallLog<(i64,), i64>>("render").unwrap();
//!         let logged: Vec<String> = calls.results().iter().map(i64::to_string).collect();
//!         rendered == logged && calls.args().iter().map(|(x,)| *x).eq(inputs.iter().copied())
//!     },
//!     TestConfig::default().iterations(50).seed(3),
//! );
//! assert!(result.is_ok());
//! ```

pub mod config;
pub mod error;
pub mod execution;
pub mod func;
pub mod generator;
pub mod outcome;
pub mod pipe;
pub mod primitives;
pub mod property;
pub mod record;
pub mod rng;
pub mod spy;
pub mod spy_async;
pub mod spying;

pub use config::{CASES_ENV, ConfigError, GeneratorConfig, SEED_ENV, TestConfig};
pub use error::{
    CompositionError, PropertyError, PropertyResult, RecordError, TestFailure, TestSuccess,
};
pub use execution::{
    AsyncPropertyTest, PropertyTest, check, check_async, check_async_with_config,
    check_with_config,
};
pub use func::{FuncGenerator, RandomFn, func};
pub use generator::{BoxedGenerator, Generator, from_fn, just};
pub use outcome::Outcome;
pub use primitives::*;
pub use property::{AsyncProperty, Property, Verdict};
pub use record::{FieldValue, FromRecord, Record};
pub use rng::{create_rng, create_seeded_rng};
pub use spy::{CallLog, Reset, Spied, SpyFn, Truncate, arb_spy_fn, arb_spy_fn_with};
pub use spy_async::{AsyncSpyFn, Settle, arb_spy_async_fn};
pub use spying::{
    Bindable, Finalized, Fixture, RecordField, Sample, SpyingArbitrary, bind, bind_as, empty,
    field, map, record, to_arbitrary,
};

// Re-export derive macro from separate crate when derive feature is enabled
#[cfg(feature = "derive")]
pub use spyglass_derive::FromRecord;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_api_integration() {
        let fixture = empty()
            .bind("n", |_| int_range(1u8, 3))
            .bind("spy", |_| arb_spy_fn::<(u8,), _>(just('x')));
        let mut rng = create_seeded_rng(1);
        let (log, value) = to_arbitrary(fixture).generate(&mut rng, &GeneratorConfig::default());

        let spy = value.field::<SpyFn<(u8,), char>>("spy").unwrap();
        let n = *value.field::<u8>("n").unwrap();
        for i in 0..n {
            assert_eq!(spy.call((i,)), 'x');
        }
        assert_eq!(
            log.field::<CallLog<(u8,), char>>("spy").unwrap().len(),
            usize::from(n)
        );
    }
}
