//! Configuration system for RouteForge.
//!
//! Load solver configuration from TOML or YAML files to control the
//! first-solution strategy, the improvement metaheuristic and termination
//! without code changes.
//!
//! # Examples
//!
//! Load configuration from a TOML string:
//!
//! ```
//! use routeforge_config::{FirstSolutionStrategy, Metaheuristic, SolverConfig};
//! use std::time::Duration;
//!
//! let config = SolverConfig::from_toml_str(r#"
//!     first_solution_strategy = "cheapest_insertion"
//!     metaheuristic = "guided_local_search"
//!
//!     [termination]
//!     seconds_spent_limit = 5
//!
//!     [guided_local_search]
//!     lambda = 0.2
//! "#).unwrap();
//!
//! assert_eq!(config.time_limit(), Some(Duration::from_secs(5)));
//! assert_eq!(config.metaheuristic, Metaheuristic::GuidedLocalSearch);
//! ```
//!
//! Use the default config when no file is present:
//!
//! ```
//! use routeforge_config::SolverConfig;
//!
//! let config = SolverConfig::load("solver.toml").unwrap_or_default();
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Strategy used to build the first solution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FirstSolutionStrategy {
    /// Repeatedly insert the unrouted node with the cheapest feasible
    /// marginal cost, anywhere in any route.
    #[default]
    CheapestInsertion,
    /// Extend one vehicle path at a time with the cheapest feasible arc
    /// out of the path's current end.
    PathCheapestArc,
}

/// Metaheuristic driving the improvement phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metaheuristic {
    /// Pure descent: stop at the first local optimum.
    None,
    /// Guided local search: penalize expensive used arcs at each local
    /// optimum and keep searching until the budget runs out.
    #[default]
    GuidedLocalSearch,
}

/// Termination configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TerminationConfig {
    /// Wall-clock limit in whole seconds.
    #[serde(default)]
    pub seconds_spent_limit: Option<u64>,

    /// Wall-clock limit in milliseconds, added to `seconds_spent_limit`.
    #[serde(default)]
    pub millis_spent_limit: Option<u64>,

    /// Maximum number of improvement steps.
    #[serde(default)]
    pub step_count_limit: Option<u64>,
}

/// Guided local search tuning.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct GuidedLocalSearchConfig {
    /// Penalty scaling factor relative to the mean used-arc cost.
    #[serde(default = "default_lambda")]
    pub lambda: f64,
}

fn default_lambda() -> f64 {
    0.1
}

impl Default for GuidedLocalSearchConfig {
    fn default() -> Self {
        Self {
            lambda: default_lambda(),
        }
    }
}

/// Main solver configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SolverConfig {
    /// First-solution strategy.
    #[serde(default)]
    pub first_solution_strategy: FirstSolutionStrategy,

    /// Improvement metaheuristic.
    #[serde(default)]
    pub metaheuristic: Metaheuristic,

    /// Termination configuration. `None` means the improvement phase runs
    /// until it stops on its own (or is cancelled externally).
    #[serde(default)]
    pub termination: Option<TerminationConfig>,

    /// Guided local search tuning.
    #[serde(default)]
    pub guided_local_search: GuidedLocalSearchConfig,
}

impl SolverConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the termination time limit in whole seconds.
    pub fn with_termination_seconds(mut self, seconds: u64) -> Self {
        self.termination = Some(TerminationConfig {
            seconds_spent_limit: Some(seconds),
            ..self.termination.unwrap_or_default()
        });
        self
    }

    /// Sets the termination time limit in milliseconds.
    pub fn with_termination_millis(mut self, millis: u64) -> Self {
        self.termination = Some(TerminationConfig {
            millis_spent_limit: Some(millis),
            ..self.termination.unwrap_or_default()
        });
        self
    }

    /// Sets the improvement step limit.
    pub fn with_step_count_limit(mut self, steps: u64) -> Self {
        self.termination = Some(TerminationConfig {
            step_count_limit: Some(steps),
            ..self.termination.unwrap_or_default()
        });
        self
    }

    /// Sets the first-solution strategy.
    pub fn with_first_solution_strategy(mut self, strategy: FirstSolutionStrategy) -> Self {
        self.first_solution_strategy = strategy;
        self
    }

    /// Sets the improvement metaheuristic.
    pub fn with_metaheuristic(mut self, metaheuristic: Metaheuristic) -> Self {
        self.metaheuristic = metaheuristic;
        self
    }

    /// Returns the combined wall-clock limit, if any.
    pub fn time_limit(&self) -> Option<Duration> {
        let termination = self.termination.as_ref()?;
        let secs = termination.seconds_spent_limit;
        let millis = termination.millis_spent_limit;
        if secs.is_none() && millis.is_none() {
            return None;
        }
        Some(
            Duration::from_secs(secs.unwrap_or(0)) + Duration::from_millis(millis.unwrap_or(0)),
        )
    }

    /// Returns the improvement step limit, if any.
    pub fn step_count_limit(&self) -> Option<u64> {
        self.termination.as_ref()?.step_count_limit
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let lambda = self.guided_local_search.lambda;
        if !lambda.is_finite() || lambda <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "guided_local_search.lambda must be positive and finite, got {lambda}"
            )));
        }
        Ok(())
    }
}
