//! Configuration management for Prism.
//!
//! Configuration is loaded from a platform config directory with sensible
//! defaults; every section implements `Default` so a missing file just means
//! the preset pipeline.

mod types;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for Prism.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Pipeline defaults (output dir, steps, formats)
    pub pipeline: PipelineOptions,

    /// Resource limits
    pub limits: LimitsConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.prism.prism/config.toml
    /// - Linux: ~/.config/prism/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\prism\config\config.toml
    ///
    /// Falls back to ~/.prism/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "prism", "prism")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".prism").join("config.toml")
            })
    }

    /// Get the resolved output directory path (with ~ expansion).
    pub fn output_dir(&self) -> PathBuf {
        let path_str = self.pipeline.dir.to_string_lossy();
        let expanded = shellexpand::tilde(&path_str);
        PathBuf::from(expanded.into_owned())
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SizeSpec;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.pipeline.dir, PathBuf::from("./"));
        assert_eq!(config.pipeline.steps.len(), 4);
        assert_eq!(config.pipeline.color, ColorPolicy::Required);
        assert_eq!(config.limits.fetch_timeout_ms, 30_000);
        assert_eq!(config.limits.max_image_dimension, 10_000);
    }

    #[test]
    fn test_default_steps_preset() {
        let steps = default_steps();
        assert_eq!(steps[0].size, Some(SizeSpec::exact(960, 836)));
        assert_eq!(steps[0].suffix.as_deref(), Some("_retina"));
        assert!(steps[1].suffix.is_none());
        assert_eq!(steps[3].suffix.as_deref(), Some("_small"));
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[pipeline]"));
        assert!(toml.contains("[limits]"));
        assert!(toml.contains("[logging]"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[pipeline]
dir = "./variants"
name = "hero"
webp = true
color = "skip"

[[pipeline.steps]]
label = "banner"
size = [1200, 400]

[[pipeline.steps]]
label = "thumb"
size = [256]
folder = "thumbs"

[limits]
decode_timeout_ms = 1000
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.pipeline.dir, PathBuf::from("./variants"));
        assert_eq!(config.pipeline.name.as_deref(), Some("hero"));
        assert!(config.pipeline.webp);
        assert_eq!(config.pipeline.color, ColorPolicy::Skip);
        assert_eq!(config.pipeline.steps.len(), 2);
        assert_eq!(
            config.pipeline.steps[0].size,
            Some(SizeSpec::exact(1200, 400))
        );
        assert_eq!(config.pipeline.steps[1].size, Some(SizeSpec::width(256)));
        assert_eq!(config.pipeline.steps[1].folder.as_deref(), Some("thumbs"));
        assert_eq!(config.limits.decode_timeout_ms, 1000);
        // Unset sections keep their defaults
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_from_rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "pipeline = not valid").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_output_dir_tilde_expansion() {
        let mut config = Config::default();
        config.pipeline.dir = PathBuf::from("~/pictures/variants");
        let resolved = config.output_dir();
        assert!(resolved.ends_with("pictures/variants"));
        if std::env::var("HOME").is_ok() {
            assert!(!resolved.to_string_lossy().starts_with('~'));
        }
    }
}
