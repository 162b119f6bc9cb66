//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/feasibility/feasibility.toml`
//! 3. Environment variables: `FEASIBILITY_*` prefix
//! 4. CLI overrides (`--cases-dir`)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// Unified configuration for feasibility.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Directory holding case documents (default: ~/.feasibility/cases)
    pub cases_dir: PathBuf,
    /// Indent JSON case documents
    pub pretty_json: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cases_dir: dirs_default_cases_dir(),
            pretty_json: true,
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub cases_dir: Option<PathBuf>,
    pub pretty_json: Option<bool>,
}

/// Get the default cases directory (~/.feasibility/cases).
fn dirs_default_cases_dir() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".feasibility").join("cases"))
        .unwrap_or_else(|| PathBuf::from("~/.feasibility/cases"))
}

/// Get the XDG config directory for feasibility.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "feasibility").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("feasibility.toml"))
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

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
pub fn expand_path(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        let expanded = expand_path(self.cases_dir.to_string_lossy().as_ref());
        self.cases_dir = PathBuf::from(expanded);
    }

    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            cases_dir: overlay
                .cases_dir
                .clone()
                .unwrap_or_else(|| self.cases_dir.clone()),
            pretty_json: overlay.pretty_json.unwrap_or(self.pretty_json),
        }
    }

    /// Load settings with layered precedence from the XDG global config.
    pub fn load() -> Result<Self, ApplicationError> {
        Self::load_from(global_config_path().as_deref())
    }

    /// Load settings using `config_file` as the global layer.
    ///
    /// A missing file is skipped; a malformed one is an error.
    pub fn load_from(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config file
        if let Some(path) = config_file {
            if path.exists() {
                let raw = load_raw_settings(path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Environment variables (explicit override)
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();
        Ok(current)
    }

    /// Apply FEASIBILITY_* environment variables as explicit overrides.
    fn apply_env_overrides(settings: Self) -> Result<Self, ApplicationError> {
        Self::apply_env_source(settings, env_source())
    }

    fn apply_env_source(mut settings: Self, env: Environment) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(env)
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("cases_dir") {
            settings.cases_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_bool("pretty_json") {
            settings.pretty_json = val;
        }

        Ok(settings)
    }

    /// Apply a CLI override of the cases directory.
    pub fn with_cases_dir(mut self, cases_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = cases_dir {
            self.cases_dir = dir;
            self.expand_paths();
        }
        self
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# feasibility configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/feasibility/feasibility.toml
#   Env:    FEASIBILITY_* environment variables (explicit overrides)
#   CLI:    --cases-dir

# Directory holding case documents (one JSON file per case)
# cases_dir = "~/.feasibility/cases"

# Indent JSON case documents
# pretty_json = true
"#
        .to_string()
    }
}

/// `FEASIBILITY_PRETTY_JSON` -> `pretty_json`; `__` separates nested keys.
fn env_source() -> Environment {
    Environment::with_prefix("FEASIBILITY")
        .prefix_separator("_")
        .separator("__")
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_no_config_when_loading_then_uses_defaults() {
        let settings = Settings::load_from(None).expect("load defaults");
        assert!(settings.cases_dir.to_string_lossy().contains(".feasibility"));
        assert!(settings.pretty_json);
    }

    #[test]
    fn given_tilde_in_cases_dir_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            cases_dir: PathBuf::from("~/studies"),
            pretty_json: true,
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let dir = settings.cases_dir.to_string_lossy();
        assert!(dir.starts_with(&home), "cases_dir should start with home: {dir}");
        assert!(!dir.contains('~'), "cases_dir should not contain tilde: {dir}");
    }

    #[test]
    fn given_overlay_without_values_when_merging_then_keeps_base() {
        let base = Settings {
            cases_dir: PathBuf::from("/data/cases"),
            pretty_json: false,
        };
        let merged = base.merge_with(&RawSettings::default());
        assert_eq!(merged, base);
    }

    #[test]
    fn given_single_underscore_env_vars_when_applied_then_override() {
        let vars = config::Map::from([
            ("FEASIBILITY_PRETTY_JSON".to_string(), "false".to_string()),
            ("FEASIBILITY_CASES_DIR".to_string(), "/srv/cases".to_string()),
            ("OTHER_PRETTY_JSON".to_string(), "true".to_string()),
        ]);
        let base = Settings {
            cases_dir: PathBuf::from("/data/cases"),
            pretty_json: true,
        };

        let settings = Settings::apply_env_source(base, env_source().source(Some(vars)))
            .expect("apply env");

        assert!(!settings.pretty_json);
        assert_eq!(settings.cases_dir, PathBuf::from("/srv/cases"));
    }

    #[test]
    fn given_template_when_parsed_then_is_valid_toml() {
        let raw: RawSettings = toml::from_str(&Settings::template()).expect("template parses");
        assert!(raw.cases_dir.is_none());
        assert!(raw.pretty_json.is_none());
    }
}
