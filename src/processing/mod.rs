//! Single-file conversion: open, decode, encode as WebP, write, stat

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use serde::Serialize;
use tokio::fs;
use tracing::{debug, warn};

use crate::config::{ConversionConfig, OverwritePolicy};
use crate::error::{ConversionError, ErrorContext, IoStage, Result, WebpifyError};

pub mod formats;

pub use formats::*;

/// Converts one source file into its WebP sibling
pub struct ConversionEngine {
    config: ConversionConfig,
}

impl ConversionEngine {
    /// Create a new engine with the given conversion settings
    pub fn new(config: ConversionConfig) -> Self {
        Self { config }
    }

    /// The settings this engine converts with
    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    /// Convert `source` into `destination`.
    ///
    /// The outer `Result` carries run-level failures (a codec task that could
    /// not be joined); the inner one carries the per-file outcome.
    pub async fn convert_file(
        &self,
        source: &Path,
        destination: &Path,
    ) -> Result<std::result::Result<ConversionOutcome, ConversionError>> {
        let start_time = Instant::now();
        debug!("Converting file: {:?} -> {:?}", source, destination);

        if fs::try_exists(destination).await.unwrap_or(false) {
            match self.config.overwrite {
                OverwritePolicy::Overwrite => {
                    debug!("Overwriting existing file: {:?}", destination);
                }
                OverwritePolicy::Skip => {
                    debug!("Destination exists, skipping: {:?}", destination);
                    return Ok(Ok(ConversionOutcome::Skipped {
                        destination: destination.to_path_buf(),
                    }));
                }
                OverwritePolicy::Error => {
                    return Ok(Err(ConversionError::DestinationExists {
                        path: destination.to_path_buf(),
                    }));
                }
            }
        }

        let data = match fs::read(source).await.with_file_context(IoStage::Open, source) {
            Ok(data) => data,
            Err(e) => return Ok(Err(e)),
        };

        if let Some(format) = detect_format_from_header(&data) {
            if format != ImageFormat::Png {
                warn!("{:?} has {} content, not png", source, format.extension());
            }
        }

        let encoded = tokio::task::spawn_blocking({
            let source = source.to_path_buf();
            let quality = self.config.quality;
            move || encode_source(data, &source, quality)
        })
        .await
        .map_err(|e| WebpifyError::system(format!("Task join error: {}", e)))?;

        let (bytes, width, height) = match encoded {
            Ok(encoded) => encoded,
            Err(e) => return Ok(Err(e)),
        };

        Ok(self.finish(source, destination, bytes, width, height, start_time).await)
    }

    /// Write the encoded bytes, sample sizes and optionally remove the source
    async fn finish(
        &self,
        source: &Path,
        destination: &Path,
        bytes: Vec<u8>,
        width: u32,
        height: u32,
        start_time: Instant,
    ) -> std::result::Result<ConversionOutcome, ConversionError> {
        fs::write(destination, &bytes)
            .await
            .with_file_context(IoStage::Write, destination)?;
        drop(bytes);

        let original_size = fs::metadata(source)
            .await
            .with_file_context(IoStage::Stat, source)?
            .len();
        let converted_size = fs::metadata(destination)
            .await
            .with_file_context(IoStage::Stat, destination)?
            .len();

        let source_removed = if self.config.delete_source {
            fs::remove_file(source)
                .await
                .with_file_context(IoStage::RemoveSource, source)?;
            debug!("Removed source: {:?}", source);
            true
        } else {
            false
        };

        let report = ConversionReport {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            width,
            height,
            original_size,
            converted_size,
            processing_time: start_time.elapsed(),
            source_removed,
        };

        debug!(
            "Converted {}x{} image: {} -> {} bytes in {:.2}s",
            report.width,
            report.height,
            report.original_size,
            report.converted_size,
            report.processing_time.as_secs_f64()
        );

        Ok(ConversionOutcome::Converted(report))
    }
}

impl Default for ConversionEngine {
    fn default() -> Self {
        Self::new(ConversionConfig::default())
    }
}

/// Decode and encode on the blocking pool
fn encode_source(
    data: Vec<u8>,
    source: &Path,
    quality: u8,
) -> std::result::Result<(Vec<u8>, u32, u32), ConversionError> {
    let image = image::load_from_memory(&data).map_err(|e| ConversionError::Decode {
        path: source.to_path_buf(),
        source: e,
    })?;
    drop(data);

    let bytes = encode_webp(&image, quality).map_err(|message| ConversionError::Encode {
        path: source.to_path_buf(),
        message,
    })?;

    Ok((bytes, image.width(), image.height()))
}

/// What happened to a file that did not fail
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConversionOutcome {
    Converted(ConversionReport),
    Skipped { destination: PathBuf },
}

/// Statistics for a successful conversion
#[derive(Debug, Clone, Serialize)]
pub struct ConversionReport {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub width: u32,
    pub height: u32,
    pub original_size: u64,
    pub converted_size: u64,
    #[serde(serialize_with = "serialize_duration_secs")]
    pub processing_time: Duration,
    pub source_removed: bool,
}

impl ConversionReport {
    /// Size reduction percentage, `(1 - converted / original) * 100`.
    ///
    /// Negative when the WebP file is larger than the source.
    pub fn size_reduction(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        (1.0 - self.converted_size as f64 / self.original_size as f64) * 100.0
    }
}

fn serialize_duration_secs<S: serde::Serializer>(
    duration: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}
