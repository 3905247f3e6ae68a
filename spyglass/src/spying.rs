//! Composition of spies and plain generators into one fixture.
//!
//! A [`SpyingArbitrary`] generates [`Sample`]s: a value, the logs of every spy
//! inside it, and the [`Reset`] that empties those logs. Fixtures start from
//! [`empty`] and grow one named field at a time with [`bind`], [`bind_as`] or
//! [`record`]. Field names and log keys are checked when the fixture is built,
//! so a clash fails before anything is drawn.
//!
//! [`to_arbitrary`] turns a fixture into a plain [`Generator`] of `(log, value)`
//! pairs. Every draw runs the sample's reset first, which erases calls made
//! while the fixture itself was being generated.
//!
//! ```rust
//! use spyglass::{
//!     CallLog, Generator, GeneratorConfig, SpyFn, arb_spy_fn, create_seeded_rng, field, ints, record,
//!     to_arbitrary, vec_of,
//! };
//!
//! let fixture = record(vec![
//!     field("double", arb_spy_fn::<(i32,), _>(ints::<i64>())),
//!     field("inputs", vec_of(ints::<i32>(), 1, 5)),
//! ]);
//!
//! let mut rng = create_seeded_rng(7);
//! let (log, value) = to_arbitrary(fixture).generate(&mut rng, &GeneratorConfig::default());
//!
//! let double = value.field::<SpyFn<(i32,), i64>>("double").unwrap();
//! let inputs = value.field::<Vec<i32>>("inputs").unwrap();
//! for x in inputs {
//!     double.call((*x,));
//! }
//!
//! let calls = log.field::<CallLog<(i32,), i64>>("double").unwrap();
//! assert_eq!(calls.len(), inputs.len());
//! ```

use std::fmt;
use std::sync::Arc;

use rand::RngCore;

use crate::config::GeneratorConfig;
use crate::error::CompositionError;
use crate::generator::{BoxedGenerator, Generator, from_fn};
use crate::record::{FieldValue, FromRecord, Record};
use crate::spy::Reset;

/// One draw of a fixture
pub struct Sample<L, A> {
    /// Empties every log reachable from this sample
    pub reset: Reset,
    /// The call logs
    pub log: L,
    /// The generated value
    pub value: A,
}

impl<L: fmt::Debug, A: fmt::Debug> fmt::Debug for Sample<L, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sample")
            .field("reset", &self.reset)
            .field("log", &self.log)
            .field("value", &self.value)
            .finish()
    }
}

/// Keys a fixture is known to produce
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Shape {
    values: Vec<&'static str>,
    logs: Vec<&'static str>,
}

impl Shape {
    fn extend(
        &self,
        name: &'static str,
        log_key: Option<&'static str>,
    ) -> Result<Shape, CompositionError> {
        if self.values.contains(&name) {
            return Err(CompositionError::DuplicateField { name });
        }
        let mut next = self.clone();
        if let Some(key) = log_key {
            if self.logs.contains(&key) {
                return Err(CompositionError::DuplicateLogKey { key });
            }
            next.logs.push(key);
        }
        next.values.push(name);
        Ok(next)
    }
}

/// A generator of values bundled with their spies' call logs
pub struct SpyingArbitrary<L, A> {
    run: BoxedGenerator<Sample<L, A>>,
    shape: Shape,
}

impl<L, A> Clone for SpyingArbitrary<L, A> {
    fn clone(&self) -> Self {
        Self {
            run: Arc::clone(&self.run),
            shape: self.shape.clone(),
        }
    }
}

impl<L, A> fmt::Debug for SpyingArbitrary<L, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpyingArbitrary")
            .field("values", &self.shape.values)
            .field("logs", &self.shape.logs)
            .finish()
    }
}

impl<L, A> SpyingArbitrary<L, A> {
    /// Wrap a generator of samples
    pub fn new(samples: impl Generator<Value = Sample<L, A>> + Send + Sync + 'static) -> Self {
        Self {
            run: Arc::new(samples),
            shape: Shape::default(),
        }
    }

    /// Value keys bound so far, in binding order
    pub fn value_keys(&self) -> &[&'static str] {
        &self.shape.values
    }

    /// Log keys bound so far, in binding order
    pub fn log_keys(&self) -> &[&'static str] {
        &self.shape.logs
    }

    /// The raw samples, before any reset has run
    pub fn into_samples(self) -> BoxedGenerator<Sample<L, A>> {
        self.run
    }

    /// A plain generator of `(log, value)` pairs with freshly reset logs
    pub fn finalize(self) -> Finalized<L, A> {
        Finalized { run: self.run }
    }
}

impl<L: 'static, A: 'static> SpyingArbitrary<L, A> {
    /// Transform the generated value, keeping logs and reset
    pub fn map<B, F>(self, f: F) -> SpyingArbitrary<L, B>
    where
        F: Fn(A) -> B + Send + Sync + 'static,
        B: 'static,
    {
        SpyingArbitrary {
            run: self
                .run
                .map(move |sample: Sample<L, A>| Sample {
                    reset: sample.reset,
                    log: sample.log,
                    value: f(sample.value),
                })
                .boxed(),
            shape: self.shape,
        }
    }

    /// Transform the call logs, keeping value and reset
    pub fn map_log<M, F>(self, f: F) -> SpyingArbitrary<M, A>
    where
        F: Fn(L) -> M + Send + Sync + 'static,
        M: 'static,
    {
        SpyingArbitrary {
            run: self
                .run
                .map(move |sample: Sample<L, A>| Sample {
                    reset: sample.reset,
                    log: f(sample.log),
                    value: sample.value,
                })
                .boxed(),
            shape: self.shape,
        }
    }
}

/// Something a fixture field can be bound to
///
/// Plain generators contribute a value only. A [`SpyingArbitrary`] also
/// contributes its log and reset.
pub trait Bindable {
    /// Log contributed under the log key
    type Log;
    /// Value contributed under the field name
    type Value;
    /// Whether this kind of binding contributes a log
    const SPIES: bool;

    /// Draw one sample
    fn draw(&self, rng: &mut dyn RngCore, config: &GeneratorConfig)
    -> Sample<Self::Log, Self::Value>;
}

impl<G: Generator> Bindable for G {
    type Log = ();
    type Value = G::Value;
    const SPIES: bool = false;

    fn draw(&self, rng: &mut dyn RngCore, config: &GeneratorConfig) -> Sample<(), G::Value> {
        Sample {
            reset: Reset::noop(),
            log: (),
            value: self.generate(rng, config),
        }
    }
}

impl<L, B> Bindable for SpyingArbitrary<L, B> {
    type Log = L;
    type Value = B;
    const SPIES: bool = true;

    fn draw(&self, rng: &mut dyn RngCore, config: &GeneratorConfig) -> Sample<L, B> {
        self.run.generate(rng, config)
    }
}

/// Shorthand for the record-shaped fixtures built by [`bind`] and [`record`]
pub type Fixture = SpyingArbitrary<Record, Record>;

/// The empty fixture: no logs, no values, nothing to reset
pub fn empty() -> Fixture {
    SpyingArbitrary::new(from_fn(|_, _| Sample {
        reset: Reset::noop(),
        log: Record::new(),
        value: Record::new(),
    }))
}

impl SpyingArbitrary<Record, Record> {
    /// Bind `name` to whatever `derive` builds from the values bound so far,
    /// logging spies under `name` as well
    ///
    /// # Panics
    ///
    /// Panics if `name` is already bound as a field, or as a log key when
    /// `derive` builds a spying fixture.
    pub fn bind<T, F>(self, name: &'static str, derive: F) -> Self
    where
        F: Fn(&Record) -> T + Send + Sync + 'static,
        T: Bindable,
        T::Log: FieldValue,
        T::Value: FieldValue,
    {
        self.bind_as(name, name, derive)
    }

    /// Like [`bind`](Self::bind) with a separate key for the log
    ///
    /// # Panics
    ///
    /// Panics on a duplicate field name or log key.
    pub fn bind_as<T, F>(self, name: &'static str, log_key: &'static str, derive: F) -> Self
    where
        F: Fn(&Record) -> T + Send + Sync + 'static,
        T: Bindable,
        T::Log: FieldValue,
        T::Value: FieldValue,
    {
        match self.try_bind_as(name, log_key, derive) {
            Ok(fixture) => fixture,
            Err(err) => panic!("{err}"),
        }
    }

    /// Like [`bind_as`](Self::bind_as), returning key clashes as errors
    pub fn try_bind_as<T, F>(
        self,
        name: &'static str,
        log_key: &'static str,
        derive: F,
    ) -> Result<Self, CompositionError>
    where
        F: Fn(&Record) -> T + Send + Sync + 'static,
        T: Bindable,
        T::Log: FieldValue,
        T::Value: FieldValue,
    {
        let shape = self
            .shape
            .extend(name, T::SPIES.then_some(log_key))?;
        let previous = self.run;
        let run = from_fn(move |rng: &mut dyn RngCore, config: &GeneratorConfig| {
            let mut sample = previous.generate(rng, config);
            let next = derive(&sample.value).draw(rng, config);
            sample.value.insert(name, next.value);
            if T::SPIES {
                sample.log.insert(log_key, next.log);
                sample.reset = sample.reset.merge(next.reset);
            }
            sample
        });
        Ok(SpyingArbitrary {
            run: run.boxed(),
            shape,
        })
    }

    /// Bind every field in order, each key serving as field name and log key
    ///
    /// # Panics
    ///
    /// Panics on a duplicate key.
    pub fn record(self, fields: impl IntoIterator<Item = RecordField>) -> Self {
        match self.try_record(fields) {
            Ok(fixture) => fixture,
            Err(err) => panic!("{err}"),
        }
    }

    /// Like [`record`](Self::record), returning key clashes as errors
    pub fn try_record(
        self,
        fields: impl IntoIterator<Item = RecordField>,
    ) -> Result<Self, CompositionError> {
        fields
            .into_iter()
            .try_fold(self, |fixture, field| (field.bind)(fixture))
    }

    /// Convert logs and values into typed structs
    ///
    /// # Panics
    ///
    /// Drawing panics if a record lacks a field the target type needs, or
    /// holds it with another type.
    pub fn typed<L, A>(self) -> SpyingArbitrary<L, A>
    where
        L: FromRecord + 'static,
        A: FromRecord + 'static,
    {
        self.map_log(|log| match L::from_record(log) {
            Ok(log) => log,
            Err(err) => panic!("cannot build the log type: {err}"),
        })
        .map(|value| match A::from_record(value) {
            Ok(value) => value,
            Err(err) => panic!("cannot build the value type: {err}"),
        })
    }
}

/// One entry of a [`record`]
pub struct RecordField {
    name: &'static str,
    bind: Box<dyn FnOnce(Fixture) -> Result<Fixture, CompositionError>>,
}

impl RecordField {
    /// The key this entry binds
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordField").field("name", &self.name).finish()
    }
}

/// Build a [`record`] entry binding `name` to `bindable`
pub fn field<T>(name: &'static str, bindable: T) -> RecordField
where
    T: Bindable + Clone + Send + Sync + 'static,
    T::Log: FieldValue,
    T::Value: FieldValue,
{
    RecordField {
        name,
        bind: Box::new(move |fixture: Fixture| {
            fixture.try_bind_as(name, name, move |_| bindable.clone())
        }),
    }
}

/// A fixture binding every field in order, starting from [`empty`]
///
/// # Panics
///
/// Panics on a duplicate key.
pub fn record(fields: impl IntoIterator<Item = RecordField>) -> Fixture {
    empty().record(fields)
}

/// Curried [`SpyingArbitrary::bind`], for use with [`pipe!`](crate::pipe)
pub fn bind<T, F>(name: &'static str, derive: F) -> impl FnOnce(Fixture) -> Fixture
where
    F: Fn(&Record) -> T + Send + Sync + 'static,
    T: Bindable,
    T::Log: FieldValue,
    T::Value: FieldValue,
{
    move |fixture: Fixture| fixture.bind(name, derive)
}

/// Curried [`SpyingArbitrary::bind_as`], for use with [`pipe!`](crate::pipe)
pub fn bind_as<T, F>(
    name: &'static str,
    log_key: &'static str,
    derive: F,
) -> impl FnOnce(Fixture) -> Fixture
where
    F: Fn(&Record) -> T + Send + Sync + 'static,
    T: Bindable,
    T::Log: FieldValue,
    T::Value: FieldValue,
{
    move |fixture: Fixture| fixture.bind_as(name, log_key, derive)
}

/// Curried [`SpyingArbitrary::map`], for use with [`pipe!`](crate::pipe)
pub fn map<L, A, B, F>(f: F) -> impl FnOnce(SpyingArbitrary<L, A>) -> SpyingArbitrary<L, B>
where
    L: 'static,
    A: 'static,
    B: 'static,
    F: Fn(A) -> B + Send + Sync + 'static,
{
    move |fixture: SpyingArbitrary<L, A>| fixture.map(f)
}

/// Generator of `(log, value)` pairs whose logs start empty
pub struct Finalized<L, A> {
    run: BoxedGenerator<Sample<L, A>>,
}

impl<L, A> Clone for Finalized<L, A> {
    fn clone(&self) -> Self {
        Self {
            run: Arc::clone(&self.run),
        }
    }
}

impl<L, A> fmt::Debug for Finalized<L, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Finalized")
    }
}

impl<L, A> Generator for Finalized<L, A> {
    type Value = (L, A);

    fn generate(&self, rng: &mut dyn RngCore, config: &GeneratorConfig) -> (L, A) {
        let sample = self.run.generate(rng, config);
        sample.reset.run();
        (sample.log, sample.value)
    }
}

/// Finalise a fixture into a generator of `(log, value)` pairs
pub fn to_arbitrary<L, A>(fixture: SpyingArbitrary<L, A>) -> Finalized<L, A> {
    fixture.finalize()
}
