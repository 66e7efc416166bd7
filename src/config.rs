//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/dtgen/dtgen.toml`
//! 3. Local config: `<project_dir>/.dtgen.toml`
//! 4. Environment variables: `DTGEN_*` prefix
//!
//! Command line flags override all of these.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::{AlgorithmKind, ApplicationError, OutputFormat};

/// Default bound on dataset length; replay cost grows quadratically with tree depth.
pub const DEFAULT_MAX_ELEMENTS: usize = 6;

/// Raw settings for intermediate parsing (fields are Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub algorithm: Option<AlgorithmKind>,
    pub format: Option<OutputFormat>,
    pub max_elements: Option<usize>,
}

/// Unified configuration for dtgen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Algorithm used when none is given on the command line
    pub algorithm: AlgorithmKind,
    /// Output format of `dtgen tree`
    pub format: OutputFormat,
    /// Longest dataset accepted for enumeration
    pub max_elements: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            algorithm: AlgorithmKind::default(),
            format: OutputFormat::default(),
            max_elements: DEFAULT_MAX_ELEMENTS,
        }
    }
}

/// Get the XDG config directory for dtgen.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "dtgen").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("dtgen.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".dtgen.toml")
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
    /// Merge overlay config onto self (base): overlay wins where specified.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            algorithm: overlay.algorithm.unwrap_or(self.algorithm),
            format: overlay.format.unwrap_or(self.format),
            max_elements: overlay.max_elements.unwrap_or(self.max_elements),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional project directory for local config
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("load: global config {}", global_path.display());
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Local config
        if let Some(dir) = project_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                debug!("load: local config {}", local_path.display());
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 4. Environment variables (explicit override)
        Self::apply_env_overrides(current)
    }

    /// Apply DTGEN_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("DTGEN")
                .prefix_separator("_")
                .separator("__"),
        );
        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("algorithm") {
            settings.algorithm = val.parse()?;
        }
        if let Ok(val) = config.get_string("format") {
            settings.format = val.parse()?;
        }
        if let Ok(val) = config.get_string("max_elements") {
            settings.max_elements = val.trim().parse().map_err(|e| ApplicationError::Config {
                message: format!("DTGEN_MAX_ELEMENTS={val}: {e}"),
            })?;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        format!(
            r#"# dtgen configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/dtgen/dtgen.toml
#   Local:  <project_dir>/.dtgen.toml
#   Env:    DTGEN_* environment variables (e.g. DTGEN_MAX_ELEMENTS=5)
#
# Command line flags override everything.

# Algorithm used when -a/--algorithm is not given: bubble, insertion, shell
# algorithm = "bubble"

# Output format of `dtgen tree`: latex, text
# format = "latex"

# Longest dataset accepted; every extra element multiplies the work
# max_elements = {DEFAULT_MAX_ELEMENTS}
"#
        )
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
