//! Benchmark configuration module.
//!
//! Settings that are not part of a single run's command line are read from
//! environment variables.
//!
//! # Environment Variables
//!
//! - `SEARCHBENCH_DATA_DIRECTORY`: Directory for record and node files (default: `./data`)
//! - `SEARCHBENCH_BTREE_ORDER`: Order of the B-tree (default: `4`, even and at least 4)
//! - `SEARCHBENCH_INDEX_INTERVAL`: Records per sequential index entry (default: `100`)
//! - `SEARCHBENCH_SEED`: Seed for random record generation (default: unseeded)
//!
//! # Invariants
//!
//! - `btree_order` is always even and at least `MIN_ORDER`
//! - `index_interval` is always at least 1

use std::path::PathBuf;

use crate::btree::{DEFAULT_ORDER, MIN_ORDER};

const DATA_DIRECTORY_VAR: &str = "SEARCHBENCH_DATA_DIRECTORY";
const BTREE_ORDER_VAR: &str = "SEARCHBENCH_BTREE_ORDER";
const INDEX_INTERVAL_VAR: &str = "SEARCHBENCH_INDEX_INTERVAL";
const SEED_VAR: &str = "SEARCHBENCH_SEED";

/// Benchmark configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchConfig {
    /// Directory where generated record files and tree node files live.
    pub data_directory: PathBuf,
    /// Order of the in-memory B-tree.
    pub btree_order: usize,
    /// One sequential index entry is kept per this many records.
    pub index_interval: u64,
    /// Seed for random record files. `None` draws from the thread RNG.
    pub seed: Option<u64>,
}

/// Error returned when loading configuration fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    InvalidValue { name: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { name, message } => {
                write!(f, "invalid value for {name}: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            data_directory: PathBuf::from(Self::DEFAULT_DATA_DIRECTORY),
            btree_order: DEFAULT_ORDER,
            index_interval: Self::DEFAULT_INDEX_INTERVAL,
            seed: None,
        }
    }
}

impl BenchConfig {
    /// Default data directory.
    pub const DEFAULT_DATA_DIRECTORY: &'static str = "./data";
    /// Default number of records per index entry.
    pub const DEFAULT_INDEX_INTERVAL: u64 = 100;

    /// Load configuration from environment variables.
    ///
    /// Unset variables take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to a value that does not parse
    /// or is out of range.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_source(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let data_directory = lookup(DATA_DIRECTORY_VAR)
            .map_or_else(|| PathBuf::from(Self::DEFAULT_DATA_DIRECTORY), PathBuf::from);
        let btree_order = Self::load_btree_order(lookup(BTREE_ORDER_VAR))?;
        let index_interval = Self::load_index_interval(lookup(INDEX_INTERVAL_VAR))?;
        let seed = lookup(SEED_VAR)
            .map(|value| parse(SEED_VAR, &value, "is not a valid u64 seed"))
            .transpose()?;

        Ok(Self {
            data_directory,
            btree_order,
            index_interval,
            seed,
        })
    }

    fn load_btree_order(value: Option<String>) -> Result<usize, ConfigError> {
        let Some(value) = value else {
            return Ok(DEFAULT_ORDER);
        };
        let order: usize = parse(BTREE_ORDER_VAR, &value, "is not a valid order")?;
        if order < MIN_ORDER || order % 2 != 0 {
            return Err(invalid(
                BTREE_ORDER_VAR,
                format!("'{value}' must be even and at least {MIN_ORDER}"),
            ));
        }
        Ok(order)
    }

    fn load_index_interval(value: Option<String>) -> Result<u64, ConfigError> {
        let Some(value) = value else {
            return Ok(Self::DEFAULT_INDEX_INTERVAL);
        };
        let interval: u64 = parse(INDEX_INTERVAL_VAR, &value, "is not a valid interval")?;
        if interval == 0 {
            return Err(invalid(INDEX_INTERVAL_VAR, "must be at least 1".to_string()));
        }
        Ok(interval)
    }
}

fn parse<T: std::str::FromStr>(name: &str, value: &str, problem: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(name, format!("'{value}' {problem}")))
}

fn invalid(name: &str, message: String) -> ConfigError {
    ConfigError::InvalidValue {
        name: name.to_string(),
        message,
    }
}
