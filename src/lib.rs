//! Webpify - batch PNG to WebP converter
//!
//! Scans a directory (non-recursively) for `.png` files, re-encodes each one
//! as lossy WebP next to the original and reports the size change per file.
//! A file that fails to convert is reported and skipped; only a directory that
//! cannot be listed stops the run.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use webpify::{BatchConverter, ConversionConfig};
//! use std::path::Path;
//!
//! # async fn example() -> webpify::Result<()> {
//! let converter = BatchConverter::new(ConversionConfig::new().quality(80));
//! let report = converter.run(Path::new("deities"), &mut std::io::stdout()).await?;
//!
//! println!("{} converted, {} failed", report.converted(), report.failed());
//! # Ok(())
//! # }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod batch;
pub mod config;
pub mod error;
pub mod processing;

// Re-export commonly used types
pub use batch::{BatchConverter, BatchReport, FileReport, FileStatus};
pub use config::{Config, ConversionConfig, LoggingConfig, NamingMode, OverwritePolicy};
pub use error::{ConversionError, ConversionErrorKind, Result, WebpifyError};
pub use processing::{ConversionEngine, ConversionOutcome, ConversionReport};

use tracing::info;
use tracing_subscriber::EnvFilter;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging from a logging configuration.
///
/// `RUST_LOG` takes precedence over `config.level`. Log output goes to stderr
/// so stdout only carries the conversion report. Calling this more than once
/// is harmless.
pub fn init_with_config(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| WebpifyError::config(format!("Invalid log level {:?}: {}", config.level, e)))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = if config.json_format {
        tracing::subscriber::set_global_default(builder.json().finish()).is_ok()
    } else {
        tracing::subscriber::set_global_default(builder.finish()).is_ok()
    };

    if installed {
        info!("Webpify v{} initialized", VERSION);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
        assert!(VERSION.contains('.'));
    }

    #[test]
    fn test_init() {
        // Should not fail on multiple calls
        let config = LoggingConfig::default();
        assert!(init_with_config(&config).is_ok());
        assert!(init_with_config(&config).is_ok());
    }
}
