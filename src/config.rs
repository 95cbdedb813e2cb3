//! Configuration for the habit engine
//!
//! The only thing the embedding application needs to choose is the storage
//! backend. Configuration loads from an optional TOML file overlaid with
//! `HEBDOMAD_`-prefixed environment variables, e.g.
//! `HEBDOMAD_STORAGE__BACKEND=sqlite HEBDOMAD_STORAGE__PATH=habits.db`.

use crate::error::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Storage backend selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "backend")]
pub enum StorageConfig {
    /// Ephemeral in-memory store (the default)
    Memory,

    /// SQLite database at the given path
    Sqlite {
        /// Database file location; created if missing
        path: PathBuf,
    },
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::Memory
    }
}

/// Top-level engine configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Where habits and completions are persisted
    #[serde(default)]
    pub storage: StorageConfig,
}

impl TrackerConfig {
    /// Load configuration from an optional file plus the environment.
    ///
    /// A missing file is not an error; every field has a default.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }

        let settings = builder
            .add_source(Environment::with_prefix("HEBDOMAD").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
