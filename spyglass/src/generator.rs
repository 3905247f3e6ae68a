//! Core generator abstraction and its combinators.
//!
//! Every fixture in this crate is ultimately a [`Generator`]: given an RNG and a
//! [`GeneratorConfig`] it produces one value. Generators are built once and drawn
//! from many times, so `generate` takes `&self` and must not rely on per-draw state.

use std::fmt;
use std::sync::Arc;

use rand::RngCore;

use crate::config::GeneratorConfig;

/// Core generator trait for creating random test data
pub trait Generator {
    /// The type of values this generator produces
    type Value;

    /// Generate a random value using the provided RNG and configuration
    fn generate(&self, rng: &mut dyn RngCore, config: &GeneratorConfig) -> Self::Value;

    /// Map this generator to produce values of a different type
    fn map<F, U>(self, f: F) -> Map<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Value) -> U,
    {
        Map {
            generator: self,
            mapper: f,
        }
    }

    /// Generate a value, then generate again from a generator that depends on it
    fn chain<F, G>(self, f: F) -> Chain<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Value) -> G,
        G: Generator,
    {
        Chain {
            generator: self,
            next: f,
        }
    }

    /// Combine this generator with another to produce tuples
    fn zip<G>(self, other: G) -> Zip<Self, G>
    where
        Self: Sized,
        G: Generator,
    {
        Zip {
            left: self,
            right: other,
        }
    }

    /// Erase the concrete type behind a shared pointer
    fn boxed(self) -> BoxedGenerator<Self::Value>
    where
        Self: Sized + Send + Sync + 'static,
    {
        Arc::new(self)
    }
}

/// A type-erased, cheaply cloneable generator
pub type BoxedGenerator<T> = Arc<dyn Generator<Value = T> + Send + Sync>;

impl<G: Generator + ?Sized> Generator for Arc<G> {
    type Value = G::Value;

    fn generate(&self, rng: &mut dyn RngCore, config: &GeneratorConfig) -> Self::Value {
        (**self).generate(rng, config)
    }
}

impl<G: Generator + ?Sized> Generator for &G {
    type Value = G::Value;

    fn generate(&self, rng: &mut dyn RngCore, config: &GeneratorConfig) -> Self::Value {
        (**self).generate(rng, config)
    }
}

/// A generator that maps values from one type to another
#[derive(Clone)]
pub struct Map<G, F> {
    generator: G,
    mapper: F,
}

impl<G, F, U> Generator for Map<G, F>
where
    G: Generator,
    F: Fn(G::Value) -> U,
{
    type Value = U;

    fn generate(&self, rng: &mut dyn RngCore, config: &GeneratorConfig) -> U {
        (self.mapper)(self.generator.generate(rng, config))
    }
}

/// A generator whose second draw depends on the first
#[derive(Clone)]
pub struct Chain<G, F> {
    generator: G,
    next: F,
}

impl<G, F, H> Generator for Chain<G, F>
where
    G: Generator,
    F: Fn(G::Value) -> H,
    H: Generator,
{
    type Value = H::Value;

    fn generate(&self, rng: &mut dyn RngCore, config: &GeneratorConfig) -> Self::Value {
        let first = self.generator.generate(rng, config);
        (self.next)(first).generate(rng, config)
    }
}

/// A generator that combines two generators to produce tuples
#[derive(Clone)]
pub struct Zip<L, R> {
    left: L,
    right: R,
}

impl<L, R> Generator for Zip<L, R>
where
    L: Generator,
    R: Generator,
{
    type Value = (L::Value, R::Value);

    fn generate(&self, rng: &mut dyn RngCore, config: &GeneratorConfig) -> Self::Value {
        let left = self.left.generate(rng, config);
        let right = self.right.generate(rng, config);
        (left, right)
    }
}

/// A generator that always produces the same value
#[derive(Debug, Clone)]
pub struct Just<T> {
    value: T,
}

impl<T: Clone> Generator for Just<T> {
    type Value = T;

    fn generate(&self, _rng: &mut dyn RngCore, _config: &GeneratorConfig) -> T {
        self.value.clone()
    }
}

/// A generator backed by a closure
#[derive(Clone)]
pub struct FromFn<F> {
    f: F,
}

impl<F, T> Generator for FromFn<F>
where
    F: Fn(&mut dyn RngCore, &GeneratorConfig) -> T,
{
    type Value = T;

    fn generate(&self, rng: &mut dyn RngCore, config: &GeneratorConfig) -> T {
        (self.f)(rng, config)
    }
}

impl<F> fmt::Debug for FromFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FromFn")
    }
}

/// Create a generator that always produces the same value
pub fn just<T: Clone>(value: T) -> Just<T> {
    Just { value }
}

/// Create a generator from a closure over the RNG and configuration
pub fn from_fn<F, T>(f: F) -> FromFn<F>
where
    F: Fn(&mut dyn RngCore, &GeneratorConfig) -> T,
{
    FromFn { f }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::create_seeded_rng;
    use rand::Rng;

    #[test]
    fn test_just_generator() {
        let generator = just(42);
        let mut rng = create_seeded_rng(1);
        let config = GeneratorConfig::default();

        for _ in 0..10 {
            assert_eq!(generator.generate(&mut rng, &config), 42);
        }
    }

    #[test]
    fn test_generator_map() {
        let generator = just(5).map(|x| x * 2);
        let mut rng = create_seeded_rng(1);
        assert_eq!(generator.generate(&mut rng, &GeneratorConfig::default()), 10);
    }

    #[test]
    fn test_generator_chain_depends_on_first_draw() {
        let generator = from_fn(|rng, _| rng.gen_range(1..=5usize))
            .chain(|len| from_fn(move |rng, _| (0..len).map(|_| rng.gen_range(0..10u8)).collect::<Vec<_>>()));
        let mut rng = create_seeded_rng(7);
        let config = GeneratorConfig::default();

        for _ in 0..20 {
            let values = generator.generate(&mut rng, &config);
            assert!((1..=5).contains(&values.len()));
            assert!(values.iter().all(|v| *v < 10));
        }
    }

    #[test]
    fn test_generator_zip() {
        let generator = just("left").zip(just(3));
        let mut rng = create_seeded_rng(1);
        assert_eq!(
            generator.generate(&mut rng, &GeneratorConfig::default()),
            ("left", 3)
        );
    }

    #[test]
    fn test_boxed_generator_is_shared() {
        let boxed: BoxedGenerator<i32> = just(9).boxed();
        let clone = boxed.clone();
        let mut rng = create_seeded_rng(1);
        let config = GeneratorConfig::default();
        assert_eq!(boxed.generate(&mut rng, &config), 9);
        assert_eq!(clone.map(|x| x + 1).generate(&mut rng, &config), 10);
    }

    #[test]
    fn test_from_fn_sees_config() {
        let generator = from_fn(|_, config| config.size_hint);
        let config = GeneratorConfig {
            size_hint: 33,
            ..GeneratorConfig::default()
        };
        let mut rng = create_seeded_rng(1);
        assert_eq!(generator.generate(&mut rng, &config), 33);
    }
}
