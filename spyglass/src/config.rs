//! Configuration types for controlling test runs and generation parameters.

use thiserror::Error;

/// Environment variable overriding [`TestConfig::iterations`]
pub const CASES_ENV: &str = "SPYGLASS_CASES";

/// Environment variable overriding [`TestConfig::seed`]
pub const SEED_ENV: &str = "SPYGLASS_SEED";

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Invalid number of iterations (must be > 0)
    #[error("Invalid iterations count: {0} (must be > 0)")]
    InvalidIterations(usize),
    /// Invalid max depth (must be > 0)
    #[error("Invalid max depth: {0} (must be > 0)")]
    InvalidMaxDepth(usize),
    /// An environment override could not be parsed
    #[error("Invalid value {value:?} for environment variable {var}")]
    InvalidEnv { var: &'static str, value: String },
}

/// Configuration for generators
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Hint for the size of generated collections
    pub size_hint: usize,
    /// Maximum depth for nested structures
    pub max_depth: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            size_hint: 10,
            max_depth: 5,
        }
    }
}

impl GeneratorConfig {
    /// Create a new generator configuration with validation
    pub fn new(size_hint: usize, max_depth: usize) -> Result<Self, ConfigError> {
        let config = Self {
            size_hint,
            max_depth,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the generator configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::InvalidMaxDepth(self.max_depth));
        }
        Ok(())
    }
}

/// Configuration for individual property tests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestConfig {
    /// Number of test iterations to run
    pub iterations: usize,
    /// Optional seed for reproducible tests
    pub seed: Option<u64>,
    /// Generator configuration overrides
    pub generator_config: GeneratorConfig,
    /// Print the full failure report instead of the summary line
    pub verbose: bool,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            iterations: 100,
            seed: None,
            generator_config: GeneratorConfig::default(),
            verbose: false,
        }
    }
}

impl TestConfig {
    /// Create a new test configuration with validation
    pub fn new(
        iterations: usize,
        seed: Option<u64>,
        generator_config: GeneratorConfig,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            iterations,
            seed,
            generator_config,
            verbose: false,
        };
        config.validate()?;
        Ok(config)
    }

    /// Default configuration with `SPYGLASS_CASES` and `SPYGLASS_SEED` applied
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|var| std::env::var(var).ok())
    }

    /// Apply overrides looked up by environment variable name
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&'static str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(value) = lookup(CASES_ENV) {
            self.iterations = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: CASES_ENV,
                value: value.clone(),
            })?;
        }
        if let Some(value) = lookup(SEED_ENV) {
            let seed = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: SEED_ENV,
                value: value.clone(),
            })?;
            self.seed = Some(seed);
        }
        self.validate()?;
        Ok(self)
    }

    /// Builder-style setter for the iteration count
    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Builder-style setter for the seed
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builder-style setter for verbose failure reports
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Validate the test configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.iterations == 0 {
            return Err(ConfigError::InvalidIterations(self.iterations));
        }
        self.generator_config.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = TestConfig::default();
        assert_eq!(config.iterations, 100);
        assert!(config.seed.is_none());
        assert!(!config.verbose);
        assert_eq!(config.generator_config.size_hint, 10);
        assert_eq!(config.generator_config.max_depth, 5);
    }

    #[test]
    fn test_config_validation() {
        assert_eq!(
            TestConfig::new(0, None, GeneratorConfig::default()),
            Err(ConfigError::InvalidIterations(0))
        );
        assert_eq!(
            GeneratorConfig::new(10, 0),
            Err(ConfigError::InvalidMaxDepth(0))
        );
        assert!(TestConfig::new(5, Some(7), GeneratorConfig::default()).is_ok());
    }

    #[test]
    fn test_overrides_applied() {
        let config = TestConfig::default()
            .with_overrides(|var| match var {
                CASES_ENV => Some("25".to_string()),
                SEED_ENV => Some(" 99 ".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.iterations, 25);
        assert_eq!(config.seed, Some(99));
    }

    #[test]
    fn test_overrides_rejected() {
        let err = TestConfig::default()
            .with_overrides(|var| (var == SEED_ENV).then(|| "not-a-seed".to_string()))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidEnv {
                var: SEED_ENV,
                value: "not-a-seed".to_string()
            }
        );

        let err = TestConfig::default()
            .with_overrides(|var| (var == CASES_ENV).then(|| "0".to_string()))
            .unwrap_err();
        assert_eq!(err, ConfigError::InvalidIterations(0));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            ConfigError::InvalidIterations(0).to_string(),
            "Invalid iterations count: 0 (must be > 0)"
        );
    }
}
