//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/jslayout/jslayout.toml`
//! 3. Local config: `<project_dir>/.jslayout.toml`
//! 4. Environment variables: `JSLAYOUT_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::DEFAULT_SEPARATOR;

/// Unified configuration for jslayout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Separator between component names in paths (default: ".")
    pub separator: String,
    /// Root component used when `--root` is not given
    pub root: Option<String>,
    /// Pretty-print JSON output (default: true)
    pub pretty: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            root: None,
            pretty: true,
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub separator: Option<String>,
    pub root: Option<String>,
    pub pretty: Option<bool>,
}

/// Get the XDG config directory for jslayout.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "jslayout").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("jslayout.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".jslayout.toml")
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

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            separator: overlay
                .separator
                .clone()
                .unwrap_or_else(|| self.separator.clone()),
            root: overlay.root.clone().or_else(|| self.root.clone()),
            pretty: overlay.pretty.unwrap_or(self.pretty),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional directory holding a local `.jslayout.toml`
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let global = global_config_path().filter(|path| path.exists());
        let local = project_dir
            .map(local_config_path)
            .filter(|path| path.exists());
        Self::load_from(global.as_deref(), local.as_deref())
    }

    /// Load settings from explicit file locations (missing layers are skipped).
    pub fn load_from(
        global: Option<&Path>,
        local: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(path) = global {
            current = current.merge_with(&load_raw_settings(path)?);
        }

        // 3. Local config
        if let Some(path) = local {
            current = current.merge_with(&load_raw_settings(path)?);
        }

        // 4. Environment variables (explicit override)
        current = Self::apply_env_overrides(current)?;

        current.validate()?;
        Ok(current)
    }

    /// Apply JSLAYOUT_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let config = Config::builder()
            .add_source(Environment::with_prefix("JSLAYOUT"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("separator") {
            settings.separator = val;
        }
        if let Ok(val) = config.get_string("root") {
            settings.root = Some(val);
        }
        if let Ok(val) = config.get_bool("pretty") {
            settings.pretty = val;
        }

        Ok(settings)
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if self.separator.is_empty() {
            return Err(ApplicationError::Config {
                message: "separator must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# jslayout configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/jslayout/jslayout.toml
#   Local:  <project_dir>/.jslayout.toml
#   Env:    JSLAYOUT_* environment variables

# Separator between component names in paths
separator = "."

# Root component used when --root is not given
# root = "checkout"

# Pretty-print JSON output
pretty = true
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_default_settings_when_created_then_uses_dot_separator() {
        let settings = Settings::default();
        assert_eq!(settings.separator, ".");
        assert!(settings.pretty);
        assert!(settings.root.is_none());
    }

    #[test]
    fn given_overlay_when_merging_then_specified_fields_win() {
        let base = Settings::default();
        let overlay = RawSettings {
            separator: Some("/".to_string()),
            root: None,
            pretty: Some(false),
        };

        let merged = base.merge_with(&overlay);

        assert_eq!(merged.separator, "/");
        assert!(merged.root.is_none());
        assert!(!merged.pretty);
    }

    #[test]
    fn given_template_when_parsed_then_yields_defaults() {
        let raw: RawSettings = toml::from_str(&Settings::template()).expect("parse template");
        let settings = Settings::default().merge_with(&raw);
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn given_settings_when_rendering_toml_then_contains_fields() {
        let settings = Settings {
            separator: "/".to_string(),
            root: Some("checkout".to_string()),
            pretty: false,
        };

        let text = settings.to_toml().unwrap();

        assert!(text.contains("separator = \"/\""));
        assert!(text.contains("root = \"checkout\""));
        assert!(text.contains("pretty = false"));
    }

    #[test]
    fn given_empty_separator_when_validating_then_errors() {
        let settings = Settings {
            separator: String::new(),
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }
}
