//! Property test execution for synchronous and asynchronous properties.
//!
//! Runs are seeded: a single RNG seeded from [`TestConfig::seed`] (or a fresh
//! random seed, which is then reported) drives every iteration, so rerunning
//! with the reported seed replays the same inputs in the same order.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Instant;

use rand::rngs::StdRng;
use tracing::{debug, warn};

use crate::config::TestConfig;
use crate::error::{PropertyError, PropertyResult, TestFailure, TestSuccess};
use crate::generator::Generator;
use crate::property::{AsyncProperty, Property};
use crate::rng::{create_seeded_rng, random_seed};

/// Core property test execution struct
pub struct PropertyTest<T, G, P> {
    generator: G,
    property: P,
    config: TestConfig,
    _phantom: PhantomData<fn() -> T>,
}

/// Async property test execution struct
pub struct AsyncPropertyTest<T, G, P> {
    generator: G,
    property: P,
    config: TestConfig,
    _phantom: PhantomData<fn() -> T>,
}

/// Iteration state shared by both runners
struct Run {
    seed: u64,
    rng: StdRng,
    started: Instant,
}

impl Run {
    fn start(config: &TestConfig) -> Self {
        let seed = config.seed.unwrap_or_else(random_seed);
        debug!(seed, iterations = config.iterations, "starting property run");
        Self {
            seed,
            rng: create_seeded_rng(seed),
            started: Instant::now(),
        }
    }

    fn generate<G: Generator>(
        &mut self,
        generator: &G,
        config: &TestConfig,
        iteration: usize,
    ) -> Result<G::Value, TestFailure> {
        debug!(iteration, seed = self.seed, "generating input");
        catch_unwind(AssertUnwindSafe(|| {
            generator.generate(&mut self.rng, &config.generator_config)
        }))
        .map_err(|payload| {
            let error = PropertyError::generation_failed_with_context(
                format!("Generator panicked: {}", panic_message(&*payload)),
                Some(format!("iteration {}", iteration)),
            );
            self.failure(error, "<not generated>".to_string(), iteration, config)
        })
    }

    fn failure(
        &self,
        error: PropertyError,
        input: String,
        iteration: usize,
        config: &TestConfig,
    ) -> TestFailure {
        let failure = TestFailure {
            error: error.at_iteration(iteration),
            input,
            iteration,
            seed: self.seed,
            elapsed: self.started.elapsed(),
        };
        warn!(iteration, seed = self.seed, "property failed");
        if config.verbose {
            eprintln!("{}", failure);
        } else {
            eprintln!("{}", failure.summary());
        }
        failure
    }

    fn success(self, config: TestConfig) -> TestSuccess {
        TestSuccess {
            iterations: config.iterations,
            seed: self.seed,
            config,
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

impl<T, G, P> PropertyTest<T, G, P>
where
    T: Clone + fmt::Debug,
    G: Generator<Value = T>,
    P: Property<T>,
{
    /// Create a new property test with the given generator, property, and configuration
    pub fn new(generator: G, property: P, config: TestConfig) -> Self {
        Self {
            generator,
            property,
            config,
            _phantom: PhantomData,
        }
    }

    /// Execute the property test
    pub fn run(self) -> PropertyResult {
        if let Err(err) = self.config.validate() {
            return Err(config_failure(err.into()));
        }
        let mut run = Run::start(&self.config);

        for iteration in 0..self.config.iterations {
            let input = run.generate(&self.generator, &self.config, iteration)?;
            let observed = input.clone();
            if let Err(error) = self.property.test(input) {
                // Rendered after the test so spy logs show the failing calls
                let rendered = format!("{:?}", observed);
                return Err(run.failure(error, rendered, iteration, &self.config));
            }
        }

        Ok(run.success(self.config))
    }
}

impl<T, G, P> AsyncPropertyTest<T, G, P>
where
    T: Clone + fmt::Debug,
    G: Generator<Value = T>,
    P: AsyncProperty<T>,
{
    /// Create a new async property test with the given generator, property, and configuration
    pub fn new(generator: G, property: P, config: TestConfig) -> Self {
        Self {
            generator,
            property,
            config,
            _phantom: PhantomData,
        }
    }

    /// Execute the async property test
    pub async fn run(self) -> PropertyResult {
        if let Err(err) = self.config.validate() {
            return Err(config_failure(err.into()));
        }
        let mut run = Run::start(&self.config);

        for iteration in 0..self.config.iterations {
            let input = run.generate(&self.generator, &self.config, iteration)?;
            let observed = input.clone();
            if let Err(error) = self.property.test(input).await {
                let rendered = format!("{:?}", observed);
                return Err(run.failure(error, rendered, iteration, &self.config));
            }
        }

        Ok(run.success(self.config))
    }
}

/// Execute a property test with the default configuration
///
/// The default configuration honours `SPYGLASS_CASES` and `SPYGLASS_SEED`;
/// malformed values fail the run with a configuration error.
pub fn check<T, G, P>(generator: G, property: P) -> PropertyResult
where
    T: Clone + fmt::Debug,
    G: Generator<Value = T>,
    P: Property<T>,
{
    match TestConfig::from_env() {
        Ok(config) => check_with_config(generator, property, config),
        Err(err) => Err(config_failure(err.into())),
    }
}

/// Execute a property test with a custom configuration
pub fn check_with_config<T, G, P>(generator: G, property: P, config: TestConfig) -> PropertyResult
where
    T: Clone + fmt::Debug,
    G: Generator<Value = T>,
    P: Property<T>,
{
    PropertyTest::new(generator, property, config).run()
}

/// Execute an async property test with the default configuration
///
/// Async closures returning `bool`, `()` or `Result<(), PropertyError>` work
/// as properties, as do types implementing [`AsyncProperty`].
pub async fn check_async<T, G, P>(generator: G, property: P) -> PropertyResult
where
    T: Clone + fmt::Debug,
    G: Generator<Value = T>,
    P: AsyncProperty<T>,
{
    match TestConfig::from_env() {
        Ok(config) => check_async_with_config(generator, property, config).await,
        Err(err) => Err(config_failure(err.into())),
    }
}

/// Execute an async property test with a custom configuration
pub async fn check_async_with_config<T, G, P>(
    generator: G,
    property: P,
    config: TestConfig,
) -> PropertyResult
where
    T: Clone + fmt::Debug,
    G: Generator<Value = T>,
    P: AsyncProperty<T>,
{
    AsyncPropertyTest::new(generator, property, config)
        .run()
        .await
}

fn config_failure(error: PropertyError) -> TestFailure {
    let failure = TestFailure {
        error,
        input: String::new(),
        iteration: 0,
        seed: 0,
        elapsed: Default::default(),
    };
    eprintln!("{}", failure.summary());
    failure
}
