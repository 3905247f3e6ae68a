//! Generators for primitive types, collections, and weighted alternatives.

use rand::distributions::uniform::SampleUniform;
use rand::distributions::{Distribution, WeightedIndex};
use rand::{Rng, RngCore};

use crate::config::GeneratorConfig;
use crate::generator::{BoxedGenerator, Generator};

/// Generator for boolean values
#[derive(Debug, Clone, Copy)]
pub struct BoolGenerator;

impl Generator for BoolGenerator {
    type Value = bool;

    fn generate(&self, rng: &mut dyn RngCore, _config: &GeneratorConfig) -> bool {
        rng.r#gen()
    }
}

/// Generator for integer types within an inclusive range
#[derive(Debug, Clone, Copy)]
pub struct IntGenerator<T> {
    min: T,
    max: T,
}

impl<T> IntGenerator<T>
where
    T: num_traits::PrimInt + SampleUniform,
{
    /// Create a new integer generator over `min..=max`
    pub fn new(min: T, max: T) -> Self {
        assert!(min <= max, "IntGenerator requires min <= max");
        Self { min, max }
    }

    /// Create an integer generator over the full range of the type
    pub fn full_range() -> Self {
        Self::new(T::min_value(), T::max_value())
    }
}

impl<T> Generator for IntGenerator<T>
where
    T: num_traits::PrimInt + SampleUniform,
{
    type Value = T;

    fn generate(&self, rng: &mut dyn RngCore, _config: &GeneratorConfig) -> T {
        rng.gen_range(self.min..=self.max)
    }
}

/// Generator for ASCII printable strings with a length range
#[derive(Debug, Clone, Copy)]
pub struct StringGenerator {
    min_length: usize,
    max_length: usize,
}

impl StringGenerator {
    /// Create a new string generator with lengths in `min_length..=max_length`
    pub fn ascii_printable(min_length: usize, max_length: usize) -> Self {
        assert!(
            min_length <= max_length,
            "StringGenerator requires min_length <= max_length"
        );
        Self {
            min_length,
            max_length,
        }
    }
}

impl Generator for StringGenerator {
    type Value = String;

    fn generate(&self, rng: &mut dyn RngCore, _config: &GeneratorConfig) -> String {
        let length = rng.gen_range(self.min_length..=self.max_length);
        (0..length)
            .map(|_| char::from(rng.gen_range(b' '..=b'~')))
            .collect()
    }
}

/// Generator for vectors whose elements come from another generator
#[derive(Debug, Clone)]
pub struct VecGenerator<G> {
    element_generator: G,
    min_length: usize,
    max_length: Option<usize>,
}

impl<G: Generator> VecGenerator<G> {
    /// Create a new vector generator with lengths in `min_length..=max_length`
    pub fn new(element_generator: G, min_length: usize, max_length: usize) -> Self {
        assert!(
            min_length <= max_length,
            "VecGenerator requires min_length <= max_length"
        );
        Self {
            element_generator,
            min_length,
            max_length: Some(max_length),
        }
    }

    /// Create a vector generator bounded by [`GeneratorConfig::size_hint`]
    pub fn sized(element_generator: G) -> Self {
        Self {
            element_generator,
            min_length: 0,
            max_length: None,
        }
    }
}

impl<G: Generator> Generator for VecGenerator<G> {
    type Value = Vec<G::Value>;

    fn generate(&self, rng: &mut dyn RngCore, config: &GeneratorConfig) -> Self::Value {
        let max_length = self
            .max_length
            .unwrap_or(config.size_hint)
            .max(self.min_length);
        let length = rng.gen_range(self.min_length..=max_length);
        (0..length)
            .map(|_| self.element_generator.generate(rng, config))
            .collect()
    }
}

/// A generator that picks uniformly from a fixed set of values
#[derive(Debug, Clone)]
pub struct ElementsGenerator<T> {
    values: Vec<T>,
}

impl<T: Clone> Generator for ElementsGenerator<T> {
    type Value = T;

    fn generate(&self, rng: &mut dyn RngCore, _config: &GeneratorConfig) -> T {
        let index = rng.gen_range(0..self.values.len());
        self.values[index].clone()
    }
}

/// A generator paired with a relative selection weight
#[derive(Debug, Clone)]
pub struct Weighted<G> {
    /// Relative frequency of this alternative
    pub weight: u32,
    /// The generator drawn from when this alternative is picked
    pub generator: G,
}

impl<G> Weighted<G> {
    /// Map the generator, keeping its weight
    pub fn map<F, U>(self, f: F) -> Weighted<crate::generator::Map<G, F>>
    where
        G: Generator,
        F: Fn(G::Value) -> U,
    {
        Weighted {
            weight: self.weight,
            generator: self.generator.map(f),
        }
    }
}

/// An unweighted alternative counts as weight 1
impl<G> From<G> for Weighted<G> {
    fn from(generator: G) -> Self {
        Self {
            weight: 1,
            generator,
        }
    }
}

/// An alternative that may or may not carry an explicit weight
///
/// Plain generators count as weight 1; a [`Weighted`] keeps its own weight.
pub trait MaybeWeighted {
    /// The values drawn by this alternative
    type Value;

    /// Normalise into a weighted, type-erased alternative
    fn into_weighted(self) -> Weighted<BoxedGenerator<Self::Value>>;
}

impl<G> MaybeWeighted for G
where
    G: Generator + Send + Sync + 'static,
{
    type Value = G::Value;

    fn into_weighted(self) -> Weighted<BoxedGenerator<G::Value>> {
        weighted(1, self.boxed())
    }
}

impl<G> MaybeWeighted for Weighted<G>
where
    G: Generator + Send + Sync + 'static,
{
    type Value = G::Value;

    fn into_weighted(self) -> Weighted<BoxedGenerator<G::Value>> {
        weighted(self.weight, self.generator.boxed())
    }
}

/// A generator that draws from one of several weighted alternatives
#[derive(Clone)]
pub struct OneOf<T> {
    alternatives: Vec<BoxedGenerator<T>>,
    index: WeightedIndex<u32>,
}

impl<T> Generator for OneOf<T> {
    type Value = T;

    fn generate(&self, rng: &mut dyn RngCore, config: &GeneratorConfig) -> T {
        let picked = self.index.sample(rng);
        self.alternatives[picked].generate(rng, config)
    }
}

impl<T> std::fmt::Debug for OneOf<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OneOf")
            .field("alternatives", &self.alternatives.len())
            .finish()
    }
}

/// Create a boolean generator
pub fn bools() -> BoolGenerator {
    BoolGenerator
}

/// Create an integer generator over the full range of `T`
pub fn ints<T>() -> IntGenerator<T>
where
    T: num_traits::PrimInt + SampleUniform,
{
    IntGenerator::full_range()
}

/// Create an integer generator over `min..=max`
pub fn int_range<T>(min: T, max: T) -> IntGenerator<T>
where
    T: num_traits::PrimInt + SampleUniform,
{
    IntGenerator::new(min, max)
}

/// Create an ASCII printable string generator
pub fn strings(min_length: usize, max_length: usize) -> StringGenerator {
    StringGenerator::ascii_printable(min_length, max_length)
}

/// Create a vector generator with lengths in `min_length..=max_length`
pub fn vec_of<G: Generator>(element: G, min_length: usize, max_length: usize) -> VecGenerator<G> {
    VecGenerator::new(element, min_length, max_length)
}

/// Create a vector generator bounded by the configured size hint
pub fn sized_vec_of<G: Generator>(element: G) -> VecGenerator<G> {
    VecGenerator::sized(element)
}

/// Create a generator that picks uniformly from `values`
pub fn elements<T: Clone>(values: Vec<T>) -> ElementsGenerator<T> {
    assert!(
        !values.is_empty(),
        "elements cannot be created with empty values"
    );
    ElementsGenerator { values }
}

/// Create a weighted alternative
pub fn weighted<G>(weight: u32, generator: G) -> Weighted<G> {
    Weighted { weight, generator }
}

/// Create a generator choosing between weighted alternatives
///
/// The chance of each alternative is its weight over the sum of all weights.
/// Alternatives with weight 0 are never picked.
///
/// # Panics
///
/// Panics if there are no alternatives or every weight is zero.
pub fn one_of<T>(alternatives: Vec<Weighted<BoxedGenerator<T>>>) -> OneOf<T> {
    let (weights, alternatives): (Vec<u32>, Vec<BoxedGenerator<T>>) = alternatives
        .into_iter()
        .map(|alt| (alt.weight, alt.generator))
        .unzip();
    let index = match WeightedIndex::new(weights) {
        Ok(index) => index,
        Err(err) => panic!("one_of needs at least one alternative with a positive weight: {err}"),
    };
    OneOf {
        alternatives,
        index,
    }
}
