//! Configuration management for Webpify

use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::error::{Result, WebpifyError};

pub mod conversion;
pub use conversion::*;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Per-file conversion settings
    pub conversion: ConversionConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level or filter directive (trace, debug, info, warn, error)
    pub level: String,

    /// Emit log lines as JSON
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .map_err(|e| WebpifyError::config(
                format!("Failed to read config file {:?}: {}", path.as_ref(), e)
            ))?;

        let extension = path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("");

        match extension.to_lowercase().as_str() {
            "toml" => toml::from_str(&content).map_err(Into::into),
            "yaml" | "yml" => serde_yaml::from_str(&content).map_err(Into::into),
            _ => Err(WebpifyError::config(
                "Unsupported config file format. Use .toml or .yaml"
            )),
        }
    }

    /// Save configuration to file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let extension = path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("");

        let content = match extension.to_lowercase().as_str() {
            "toml" => toml::to_string_pretty(self)
                .map_err(|e| WebpifyError::config(format!("TOML serialization failed: {}", e)))?,
            "yaml" | "yml" => serde_yaml::to_string(self)
                .map_err(|e| WebpifyError::config(format!("YAML serialization failed: {}", e)))?,
            _ => return Err(WebpifyError::config(
                "Unsupported config file format. Use .toml or .yaml"
            )),
        };

        std::fs::write(&path, content)
            .map_err(|e| WebpifyError::config(
                format!("Failed to write config file {:?}: {}", path.as_ref(), e)
            ))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.conversion.validate()?;

        if self.logging.level.trim().is_empty() {
            return Err(WebpifyError::config("Log level must not be empty"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.conversion.quality, DEFAULT_QUALITY);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_file_io() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            conversion: ConversionConfig::default()
                .quality(65)
                .overwrite(OverwritePolicy::Skip),
            logging: LoggingConfig::default(),
        };

        let toml_path = dir.path().join("webpify.toml");
        config.to_file(&toml_path).unwrap();
        assert_eq!(Config::from_file(&toml_path).unwrap(), config);

        let yaml_path = dir.path().join("webpify.yaml");
        config.to_file(&yaml_path).unwrap();
        assert_eq!(Config::from_file(&yaml_path).unwrap(), config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: Config = toml::from_str(
            "[conversion]\nquality = 50\nnaming = \"suffix\"\n"
        ).unwrap();

        assert_eq!(parsed.conversion.quality, 50);
        assert_eq!(parsed.conversion.naming, NamingMode::Suffix);
        assert_eq!(parsed.conversion.overwrite, OverwritePolicy::Overwrite);
        assert!(!parsed.conversion.delete_source);
        assert_eq!(parsed.logging, LoggingConfig::default());
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("webpify.ini");
        assert!(Config::default().to_file(&path).is_err());

        std::fs::write(&path, "quality = 80").unwrap();
        assert!(Config::from_file(&path).is_err());
    }

    #[test]
    fn test_output_extension_key_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("jpg.toml");
        std::fs::write(&path, "[conversion]\ntarget_extension = \".jpg\"\n").unwrap();

        assert!(Config::from_file(&path).is_err());
    }

    #[test]
    fn test_invalid_quality_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[conversion]\nquality = 150\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert!(config.validate().is_err());
    }
}
