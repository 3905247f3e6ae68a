//! Error types and result handling for spying fixtures and property runs.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::config::{ConfigError, TestConfig};

/// Error type for property testing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
    /// Property test failed with a specific message and optional context
    #[error("Property failed: {message}{}{}", fmt_context(.context), fmt_iteration(.iteration))]
    PropertyFailed {
        message: String,
        context: Option<String>,
        iteration: Option<usize>,
    },

    /// Generation of test data failed
    #[error("Generation failed: {message}{}", fmt_context(.context))]
    GenerationFailed {
        message: String,
        context: Option<String>,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

fn fmt_context(context: &Option<String>) -> String {
    context
        .as_ref()
        .map(|ctx| format!(" (context: {})", ctx))
        .unwrap_or_default()
}

fn fmt_iteration(iteration: &Option<usize>) -> String {
    iteration
        .map(|iter| format!(" (iteration: {})", iter))
        .unwrap_or_default()
}

impl PropertyError {
    /// Create a simple property failed error
    pub fn property_failed(message: impl Into<String>) -> Self {
        Self::PropertyFailed {
            message: message.into(),
            context: None,
            iteration: None,
        }
    }

    /// Create a property failed error with context
    pub fn property_failed_with_context(
        message: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self::PropertyFailed {
            message: message.into(),
            context: Some(context.into()),
            iteration: None,
        }
    }

    /// Create a generation failed error with optional context
    pub fn generation_failed_with_context(
        message: impl Into<String>,
        context: Option<String>,
    ) -> Self {
        Self::GenerationFailed {
            message: message.into(),
            context,
        }
    }

    /// Attach an iteration number to a `PropertyFailed` error that has none
    pub(crate) fn at_iteration(self, iteration: usize) -> Self {
        match self {
            Self::PropertyFailed {
                message,
                context,
                iteration: None,
            } => Self::PropertyFailed {
                message,
                context,
                iteration: Some(iteration),
            },
            other => other,
        }
    }
}

/// Errors raised when reading typed fields out of a [`Record`](crate::Record)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// No field under this key
    #[error("record has no field `{key}`")]
    MissingField { key: String },
    /// The field exists but holds a different type
    #[error("field `{key}` is not a `{expected}`")]
    FieldType { key: String, expected: &'static str },
}

/// Composition contract violations, detected when a fixture is built
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompositionError {
    /// The value record already has a field with this name
    #[error("field `{name}` is already bound in this fixture")]
    DuplicateField { name: &'static str },
    /// The log record already has an entry under this key
    #[error("log key `{key}` is already bound in this fixture")]
    DuplicateLogKey { key: &'static str },
}

/// Result of a property test execution
pub type PropertyResult = Result<TestSuccess, TestFailure>;

/// Information about a successful property run
#[derive(Debug, Clone)]
pub struct TestSuccess {
    /// Number of iterations that passed
    pub iterations: usize,
    /// Seed the run was driven by
    pub seed: u64,
    /// Configuration used for the run
    pub config: TestConfig,
}

/// Information about a failed property run
#[derive(Debug, Clone)]
pub struct TestFailure {
    /// The error that caused the failure
    pub error: PropertyError,
    /// Debug rendering of the failing input, taken after the property ran
    pub input: String,
    /// Iteration at which the failure occurred
    pub iteration: usize,
    /// Seed that reproduces the failure
    pub seed: u64,
    /// Time spent before the failure was found
    pub elapsed: Duration,
}

impl TestFailure {
    /// One-line summary in the style of the default reporter
    pub fn summary(&self) -> String {
        format!(
            "{} (iteration {}, seed {})",
            self.error, self.iteration, self.seed
        )
    }
}

impl fmt::Display for TestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Property test failed!")?;
        writeln!(f, "Error: {}", self.error)?;
        writeln!(f, "Iteration: {}", self.iteration)?;
        writeln!(f, "Seed: {} (rerun with SPYGLASS_SEED={})", self.seed, self.seed)?;
        writeln!(f, "Elapsed: {:?}", self.elapsed)?;
        write!(f, "Input: {}", self.input)
    }
}
