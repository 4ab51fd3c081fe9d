//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/mediant/mediant.toml`
//! 3. Local config: `<dir>/.mediant.toml`
//! 4. Environment variables: `MEDIANT_*` prefix
//!
//! Only the application layer reads settings; domain functions take every
//! parameter explicitly.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;

/// Resource budgets and defaults for the generators.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Upper bound on tree generations
    pub max_generations: usize,
    /// Upper bound on elements in the final tree level
    pub max_elements: usize,
    /// Upper bound on continued fraction terms
    pub max_terms: usize,
    /// Terms produced when no length is given
    pub default_max_length: usize,
    /// Level size from which mediants are computed in parallel
    pub parallel_threshold: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_generations: 24,
            max_elements: 1 << 24,
            max_terms: 10_000,
            default_max_length: 20,
            parallel_threshold: None,
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub max_generations: Option<usize>,
    pub max_elements: Option<usize>,
    pub max_terms: Option<usize>,
    pub default_max_length: Option<usize>,
    pub parallel_threshold: Option<usize>,
}

/// Get the XDG config directory for mediant.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "mediant").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("mediant.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".mediant.toml")
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins wherever it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            max_generations: overlay.max_generations.unwrap_or(self.max_generations),
            max_elements: overlay.max_elements.unwrap_or(self.max_elements),
            max_terms: overlay.max_terms.unwrap_or(self.max_terms),
            default_max_length: overlay
                .default_max_length
                .unwrap_or(self.default_max_length),
            parallel_threshold: overlay.parallel_threshold.or(self.parallel_threshold),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.mediant.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("loading global config {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(dir) = local_dir {
            current = current.merge_local(dir)?;
        }

        Self::apply_env_overrides(current)
    }

    /// Merge `<dir>/.mediant.toml` onto self if it exists.
    pub fn merge_local(&self, dir: &Path) -> Result<Self, ApplicationError> {
        let local_path = local_config_path(dir);
        if !local_path.exists() {
            return Ok(self.clone());
        }
        debug!("loading local config {}", local_path.display());
        Ok(self.merge_with(&load_raw_settings(&local_path)?))
    }

    /// Apply MEDIANT_* environment variables as explicit overrides.
    fn apply_env_overrides(settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("MEDIANT").try_parsing(true))
            .build()
            .map_err(config_err)?;
        let raw: RawSettings = config.try_deserialize().map_err(config_err)?;
        Ok(settings.merge_with(&raw))
    }

    /// Render as TOML, e.g. for `config show` or a template file.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {}", e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;
    use tempfile::TempDir;

    #[rstest]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.max_generations, 24);
        assert_eq!(settings.default_max_length, 20);
        assert_eq!(settings.parallel_threshold, None);
    }

    #[rstest]
    fn test_merge_with_only_overrides_specified_fields() {
        let overlay = RawSettings {
            max_terms: Some(50),
            parallel_threshold: Some(4096),
            ..RawSettings::default()
        };
        let merged = Settings::default().merge_with(&overlay);
        assert_eq!(merged.max_terms, 50);
        assert_eq!(merged.parallel_threshold, Some(4096));
        assert_eq!(merged.max_generations, Settings::default().max_generations);
    }

    #[rstest]
    fn test_merge_local_reads_toml() {
        let dir = TempDir::new().unwrap();
        fs::write(local_config_path(dir.path()), "max_generations = 5\n").unwrap();
        let settings = Settings::default().merge_local(dir.path()).unwrap();
        assert_eq!(settings.max_generations, 5);
    }

    #[rstest]
    fn test_merge_local_rejects_bad_toml() {
        let dir = TempDir::new().unwrap();
        fs::write(local_config_path(dir.path()), "max_generations = \"many\"\n").unwrap();
        let err = Settings::default().merge_local(dir.path()).unwrap_err();
        assert!(matches!(err, ApplicationError::Config { .. }));
    }

    #[rstest]
    fn test_to_toml_round_trips_through_raw() {
        let settings = Settings {
            parallel_threshold: Some(1024),
            ..Settings::default()
        };
        let raw: RawSettings = toml::from_str(&settings.to_toml().unwrap()).unwrap();
        assert_eq!(Settings::default().merge_with(&raw), settings);
    }
}
