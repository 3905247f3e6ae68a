//! Function-valued generation: random total functions over argument tuples.
//!
//! A [`RandomFn`] is deterministic per distinct argument tuple within one sample.
//! Each sample carries a seed drawn from the generation RNG; a call hashes the
//! seed together with the arguments and draws the result from the value
//! generator with an RNG seeded by that hash. Calling the same sample twice with
//! equal arguments therefore yields equal results, while separate samples are
//! independent.

use std::fmt;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::marker::PhantomData;

use rand::RngCore;

use crate::config::GeneratorConfig;
use crate::generator::{BoxedGenerator, Generator};
use crate::rng::create_seeded_rng;

/// A randomly drawn total function from `I` to `A`
pub struct RandomFn<I, A> {
    seed: u64,
    values: BoxedGenerator<A>,
    config: GeneratorConfig,
    _args: PhantomData<fn(&I)>,
}

impl<I: Hash, A> RandomFn<I, A> {
    /// Evaluate the function for `args`
    pub fn call(&self, args: &I) -> A {
        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        args.hash(&mut hasher);
        let mut rng = create_seeded_rng(hasher.finish());
        self.values.generate(&mut rng, &self.config)
    }
}

impl<I, A> RandomFn<I, A> {
    /// The seed identifying this sample
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl<I, A> Clone for RandomFn<I, A> {
    fn clone(&self) -> Self {
        Self {
            seed: self.seed,
            values: self.values.clone(),
            config: self.config.clone(),
            _args: PhantomData,
        }
    }
}

impl<I, A> fmt::Debug for RandomFn<I, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomFn").field("seed", &self.seed).finish()
    }
}

/// Generator of [`RandomFn`] samples
pub struct FuncGenerator<I, A> {
    values: BoxedGenerator<A>,
    _args: PhantomData<fn(&I)>,
}

impl<I, A> Clone for FuncGenerator<I, A> {
    fn clone(&self) -> Self {
        Self {
            values: self.values.clone(),
            _args: PhantomData,
        }
    }
}

impl<I, A> Generator for FuncGenerator<I, A> {
    type Value = RandomFn<I, A>;

    fn generate(&self, rng: &mut dyn RngCore, config: &GeneratorConfig) -> Self::Value {
        RandomFn {
            seed: rng.next_u64(),
            values: self.values.clone(),
            config: config.clone(),
            _args: PhantomData,
        }
    }
}

/// Create a generator of random functions from `I` to the values of `values`
pub fn func<I, G>(values: G) -> FuncGenerator<I, G::Value>
where
    G: Generator + Send + Sync + 'static,
{
    FuncGenerator {
        values: values.boxed(),
        _args: PhantomData,
    }
}
