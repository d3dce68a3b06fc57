//! Conversion settings: quality, naming and overwrite behaviour

use serde::{Deserialize, Serialize};
use crate::error::{Result, WebpifyError};

/// Default lossy WebP quality (0-100)
pub const DEFAULT_QUALITY: u8 = 80;

/// Suffix that selects source files (case-sensitive)
pub const SOURCE_EXTENSION: &str = ".png";

/// Suffix written in place of [`SOURCE_EXTENSION`]; the bytes are always WebP
pub const TARGET_EXTENSION: &str = ".webp";

/// How a single file is converted and named
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConversionConfig {
    /// Lossy WebP quality (0-100)
    pub quality: u8,

    /// How the output name is derived from the input name
    pub naming: NamingMode,

    /// What to do when the derived file already exists
    pub overwrite: OverwritePolicy,

    /// Remove the source after a fully successful conversion
    pub delete_source: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            naming: NamingMode::default(),
            overwrite: OverwritePolicy::default(),
            delete_source: false,
        }
    }
}

impl ConversionConfig {
    /// Create a conversion configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output quality
    pub fn quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    /// Set the naming mode
    pub fn naming(mut self, naming: NamingMode) -> Self {
        self.naming = naming;
        self
    }

    /// Set the overwrite policy
    pub fn overwrite(mut self, overwrite: OverwritePolicy) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Enable or disable source removal
    pub fn delete_source(mut self, delete_source: bool) -> Self {
        self.delete_source = delete_source;
        self
    }

    /// Whether `filename` is selected for conversion
    pub fn matches(&self, filename: &str) -> bool {
        filename.ends_with(SOURCE_EXTENSION)
    }

    /// Output filename for a selected source filename
    pub fn derive_output_name(&self, filename: &str) -> String {
        self.naming.apply(filename)
    }

    /// Validate the conversion settings
    pub fn validate(&self) -> Result<()> {
        if self.quality > 100 {
            return Err(WebpifyError::config(format!(
                "Quality must be between 0-100, got {}",
                self.quality
            )));
        }

        Ok(())
    }
}

/// Output filename derivation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingMode {
    /// Replace every occurrence of `.png` anywhere in the name
    #[default]
    Substring,

    /// Replace only the trailing `.png`
    Suffix,
}

impl NamingMode {
    /// Derive an output name by swapping `.png` for `.webp`
    pub fn apply(self, filename: &str) -> String {
        match self {
            Self::Substring => filename.replace(SOURCE_EXTENSION, TARGET_EXTENSION),
            Self::Suffix => match filename.strip_suffix(SOURCE_EXTENSION) {
                Some(stem) => format!("{}{}", stem, TARGET_EXTENSION),
                None => filename.to_string(),
            },
        }
    }
}

/// Behaviour when the derived output file already exists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverwritePolicy {
    /// Replace the existing file without notice
    #[default]
    Overwrite,

    /// Leave the existing file and skip the source
    Skip,

    /// Report the file as failed
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConversionConfig::default();
        assert_eq!(config.quality, 80);
        assert_eq!(config.naming, NamingMode::Substring);
        assert_eq!(config.overwrite, OverwritePolicy::Overwrite);
        assert!(!config.delete_source);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = ConversionConfig::new()
            .quality(60)
            .naming(NamingMode::Suffix)
            .overwrite(OverwritePolicy::Skip)
            .delete_source(true);

        assert_eq!(config.quality, 60);
        assert_eq!(config.naming, NamingMode::Suffix);
        assert_eq!(config.overwrite, OverwritePolicy::Skip);
        assert!(config.delete_source);
    }

    #[test]
    fn test_suffix_match_is_case_sensitive() {
        let config = ConversionConfig::default();
        assert!(config.matches("zeus.png"));
        assert!(!config.matches("zeus.PNG"));
        assert!(!config.matches("zeus.png.bak"));
        assert!(!config.matches("notes.txt"));
    }

    #[test]
    fn test_substring_naming_replaces_every_occurrence() {
        let config = ConversionConfig::default();
        assert_eq!(config.derive_output_name("zeus.png"), "zeus.webp");
        assert_eq!(config.derive_output_name("a.png.png"), "a.webp.webp");
        assert_eq!(config.derive_output_name("a.png.bak"), "a.webp.bak");
    }

    #[test]
    fn test_derived_names_are_never_selected_again() {
        let config = ConversionConfig::default();
        for name in ["zeus.png", "a.png.png", "x.png.png.png"] {
            let output = config.derive_output_name(name);
            assert!(!config.matches(&output), "{} -> {}", name, output);
        }
    }

    #[test]
    fn test_suffix_naming_replaces_trailing_extension() {
        let config = ConversionConfig::default().naming(NamingMode::Suffix);
        assert_eq!(config.derive_output_name("zeus.png"), "zeus.webp");
        assert_eq!(config.derive_output_name("a.png.png"), "a.png.webp");
        assert_eq!(config.derive_output_name("a.png.bak"), "a.png.bak");
    }

    #[test]
    fn test_validation() {
        assert!(ConversionConfig::default().quality(0).validate().is_ok());
        assert!(ConversionConfig::default().quality(100).validate().is_ok());
        assert!(ConversionConfig::default().quality(101).validate().is_err());
    }

    #[test]
    fn test_output_extension_is_not_configurable() {
        let parsed: std::result::Result<ConversionConfig, _> =
            toml::from_str("target_extension = \".jpg\"\n");
        assert!(parsed.is_err());

        let parsed: std::result::Result<ConversionConfig, _> =
            toml::from_str("source_extension = \".gif\"\n");
        assert!(parsed.is_err());
    }
}
