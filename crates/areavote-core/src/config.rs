//! Configuration loading and typed config structures for the simulator.
//!
//! The configuration lives in `areavote-config.yaml`. Every section is
//! optional; an empty file reproduces the reference comparison: the
//! proportional-linear and damped-leader rules, 40000 votes drawn from
//! `aamass` followed by 2000 votes drawn from `attack`, marginal reports.
//!
//! ```yaml
//! simulation:
//!   seed: 42
//! rules: [proportional_linear, damped_leader]
//! parameters:
//!   slot_count: 10
//!   dominance_threshold: 5000.0
//! batches:
//!   - votes: 40000
//!     table: aamass
//!   - votes: 500
//!     probabilities: [0.2, 0.9]
//! report:
//!   mode: batch_delta
//!   format: json
//! ```

use std::path::Path;

use serde::Deserialize;

use areavote_rules::{AllocationRule, RuleError, RuleParams};
use areavote_types::{ReportMode, RuleKind};

use crate::simulator::VoteBatch;
use crate::tables::{ProbabilityTable, TABLE_NAMES, TableError, named_table};

/// Environment variable overriding `simulation.seed`.
pub const SEED_ENV: &str = "AREAVOTE_SEED";

/// Environment variable overriding `report.format`.
pub const FORMAT_ENV: &str = "AREAVOTE_FORMAT";

/// Errors that can occur when loading or resolving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// An environment override could not be parsed.
    #[error("invalid value for {var}: {value:?}")]
    InvalidEnv {
        /// The environment variable name.
        var: &'static str,
        /// The rejected value.
        value: String,
    },

    /// A batch names a table that does not exist.
    #[error("unknown probability table {name:?} in batch {batch}, expected one of {known}")]
    UnknownTable {
        /// Position of the batch (0-based).
        batch: usize,
        /// The unknown name.
        name: String,
        /// Comma-separated list of valid names.
        known: String,
    },

    /// A batch is malformed.
    #[error("invalid batch {batch}: {reason}")]
    InvalidBatch {
        /// Position of the batch (0-based).
        batch: usize,
        /// Explanation of what is wrong.
        reason: String,
    },

    /// A batch table failed validation.
    #[error("invalid probability table in batch {batch}: {source}")]
    Table {
        /// Position of the batch (0-based).
        batch: usize,
        /// The underlying table error.
        source: TableError,
    },

    /// Rule parameters failed validation.
    #[error("invalid rule parameters: {source}")]
    Rule {
        /// The underlying rule error.
        #[from]
        source: RuleError,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulator configuration.
///
/// Mirrors the structure of `areavote-config.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// Run-level settings.
    #[serde(default)]
    pub simulation: RunConfig,

    /// Rules to compare, in report order.
    #[serde(default = "default_rules")]
    pub rules: Vec<RuleKind>,

    /// Constants shared by every rule.
    #[serde(default)]
    pub parameters: RuleParams,

    /// Vote batches, cast in order.
    #[serde(default = "default_batches")]
    pub batches: Vec<BatchConfig>,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            simulation: RunConfig::default(),
            rules: default_rules(),
            parameters: RuleParams::default(),
            batches: default_batches(),
            report: ReportConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Load configuration from a YAML file and apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::InvalidEnv`] if an override cannot be parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string. No environment overrides
    /// are applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Apply `AREAVOTE_SEED` and `AREAVOTE_FORMAT` when they are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnv`] if a set variable cannot be parsed.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(value) = std::env::var(SEED_ENV) {
            let seed = value.trim().parse::<u64>().map_err(|_parse| ConfigError::InvalidEnv {
                var: SEED_ENV,
                value: value.clone(),
            })?;
            self.simulation.seed = Some(seed);
        }
        if let Ok(value) = std::env::var(FORMAT_ENV) {
            self.report.format =
                OutputFormat::from_name(&value).ok_or_else(|| ConfigError::InvalidEnv {
                    var: FORMAT_ENV,
                    value: value.clone(),
                })?;
        }
        Ok(())
    }

    /// Build one rule per configured kind, all sharing `parameters`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Rule`] if the parameters are invalid.
    pub fn build_rules(&self) -> Result<Vec<AllocationRule>, ConfigError> {
        self.parameters.validate()?;
        self.rules
            .iter()
            .map(|&kind| AllocationRule::new(kind, self.parameters).map_err(ConfigError::from))
            .collect()
    }

    /// Resolve every batch into a validated [`VoteBatch`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBatch`] if a batch sets both or
    /// neither of `table` and `probabilities`,
    /// [`ConfigError::UnknownTable`] for an unknown table name, or
    /// [`ConfigError::Table`] if the table fails validation.
    pub fn build_batches(&self) -> Result<Vec<VoteBatch>, ConfigError> {
        let slot_count = self.parameters.slot_count;
        self.batches
            .iter()
            .enumerate()
            .map(|(batch, spec)| spec.resolve(batch, slot_count))
            .collect()
    }
}

/// Run-level configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct RunConfig {
    /// Seed for the vote generator. A random seed is chosen when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// One batch of votes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BatchConfig {
    /// Number of votes to cast.
    pub votes: u32,

    /// Name of a preset table.
    #[serde(default)]
    pub table: Option<String>,

    /// Inline probabilities, used instead of a preset.
    #[serde(default)]
    pub probabilities: Option<Vec<f64>>,
}

impl BatchConfig {
    /// A batch drawing from a preset table.
    pub fn named(votes: u32, table: &str) -> Self {
        Self {
            votes,
            table: Some(table.to_owned()),
            probabilities: None,
        }
    }

    fn resolve(&self, batch: usize, slot_count: usize) -> Result<VoteBatch, ConfigError> {
        let (label, values) = match (&self.table, &self.probabilities) {
            (Some(name), None) => {
                let values = named_table(name).ok_or_else(|| ConfigError::UnknownTable {
                    batch,
                    name: name.clone(),
                    known: TABLE_NAMES.join(", "),
                })?;
                (name.to_ascii_lowercase(), values.to_vec())
            }
            (None, Some(values)) => ("custom".to_owned(), values.clone()),
            (Some(_), Some(_)) => {
                return Err(ConfigError::InvalidBatch {
                    batch,
                    reason: "set either `table` or `probabilities`, not both".to_owned(),
                });
            }
            (None, None) => {
                return Err(ConfigError::InvalidBatch {
                    batch,
                    reason: "one of `table` or `probabilities` is required".to_owned(),
                });
            }
        };

        let table = ProbabilityTable::new(values, slot_count)
            .map_err(|source| ConfigError::Table { batch, source })?;
        Ok(VoteBatch::new(label, self.votes, table))
    }
}

/// Report configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct ReportConfig {
    /// How deltas are computed.
    #[serde(default)]
    pub mode: ReportMode,

    /// How reports are rendered.
    #[serde(default)]
    pub format: OutputFormat,
}

/// Output rendering format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Tab-separated console layout.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

impl OutputFormat {
    /// Parse a format name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

fn default_rules() -> Vec<RuleKind> {
    vec![RuleKind::ProportionalLinear, RuleKind::DampedLeader]
}

fn default_batches() -> Vec<BatchConfig> {
    vec![
        BatchConfig::named(40_000, "aamass"),
        BatchConfig::named(2_000, "attack"),
    ]
}
