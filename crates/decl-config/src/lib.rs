//! # decl-config
//!
//! Layered configuration loading for declscope using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`DECLSCOPE_*` prefix, `__` as separator)
//! 2. Project-level `.declscope/config.toml`
//! 3. User-level `~/.config/declscope/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `DECLSCOPE_ANALYSIS__WORKER_THREADS` -> `analysis.worker_threads`,
//! `DECLSCOPE_HARNESS__BLESS` -> `harness.bless`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use decl_config::DeclConfig;
//!
//! let config = DeclConfig::load_with_dotenv().expect("config");
//! if config.harness.bless {
//!     println!("rewriting golden files under {}", config.harness.fixtures_dir.display());
//! }
//! ```

mod analysis;
mod error;
mod harness;

pub use analysis::AnalysisConfig;
pub use error::ConfigError;
pub use harness::HarnessConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DeclConfig {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub harness: HarnessConfig,
}

impl DeclConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` loading.
    ///
    /// # Errors
    /// Returns `ConfigError::Figment` when a source cannot be read or a value
    /// has the wrong type, and `ConfigError::InvalidValue` when validation fails.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_project_dotenv();
        Self::load()
    }

    /// Extract and validate from an arbitrary provider chain.
    ///
    /// # Errors
    /// Same as [`Self::load`].
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment or add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".declscope/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("DECLSCOPE_").split("__"))
    }

    /// Reject values that deserialize fine but cannot be used.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidValue` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.harness.golden_file.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "harness.golden_file".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("declscope").join("config.toml"))
    }

    /// Load the nearest `.env` at or above the working directory.
    fn load_project_dotenv() {
        let found = std::env::current_dir()
            .ok()
            .and_then(|cwd| find_dotenv(&cwd));
        if let Some(path) = found {
            let _ = dotenvy::from_path(path);
        }
    }
}

/// The `.env` a run started in `start` should load. The search stops at the
/// project root, the first directory holding `.declscope/`, so a `.env`
/// belonging to an enclosing checkout is never picked up.
fn find_dotenv(start: &Path) -> Option<PathBuf> {
    for dir in start.ancestors() {
        let candidate = dir.join(".env");
        if candidate.is_file() {
            return Some(candidate);
        }
        if dir.join(".declscope").is_dir() {
            return None;
        }
    }
    None
}
