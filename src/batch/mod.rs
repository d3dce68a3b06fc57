//! Sequential batch conversion over one directory

use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::config::ConversionConfig;
use crate::error::{Result, WebpifyError};
use crate::processing::ConversionEngine;

pub mod report;

pub use report::*;

/// Scans a directory and converts every selected file, one at a time
pub struct BatchConverter {
    engine: ConversionEngine,
}

impl BatchConverter {
    /// Create a batch converter with the given conversion settings
    pub fn new(config: ConversionConfig) -> Self {
        Self {
            engine: ConversionEngine::new(config),
        }
    }

    fn config(&self) -> &ConversionConfig {
        self.engine.config()
    }

    /// List the filenames in `directory` selected for conversion, sorted.
    ///
    /// Only immediate children are considered. A directory that cannot be
    /// listed is a run-level failure.
    pub async fn discover(&self, directory: &Path) -> Result<Vec<String>> {
        let mut entries = fs::read_dir(directory)
            .await
            .map_err(|e| WebpifyError::list_directory(directory, e))?;

        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| WebpifyError::list_directory(directory, e))?
        {
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    debug!("Skipping non UTF-8 entry: {:?}", raw);
                    continue;
                }
            };

            if self.config().matches(&name) {
                files.push(name);
            }
        }

        files.sort();
        Ok(files)
    }

    /// Convert every selected file in `directory`, writing one line per file to `out`.
    ///
    /// Per-file failures are reported and skipped; only listing the directory,
    /// writing to `out`, or a lost codec task abort the run.
    pub async fn run<W: Write>(&self, directory: &Path, out: &mut W) -> Result<BatchReport> {
        let start_time = Instant::now();
        let files = self.discover(directory).await?;

        info!("Converting {:?} (quality {})", directory, self.config().quality);
        writeln!(out, "Found {} PNG images to process.", files.len())?;

        let mut report = BatchReport::new(directory.to_path_buf());

        for filename in files {
            let output = self.config().derive_output_name(&filename);
            let source = directory.join(&filename);
            let destination = directory.join(&output);

            let result = self.engine.convert_file(&source, &destination).await?;
            if let Err(e) = &result {
                warn!("Failed to convert {:?} ({:?}): {}", e.file_path(), e.kind(), e);
            }

            let file_report = FileReport::new(filename, output, &result);
            writeln!(out, "{}", file_report.console_line())?;
            report.files.push(file_report);
        }

        let (input, output) = report.total_sizes();
        info!(
            "Done in {:.2}s: {} converted, {} skipped, {} failed ({:.1}KB -> {:.1}KB)",
            start_time.elapsed().as_secs_f64(),
            report.converted(),
            report.skipped(),
            report.failed(),
            kib(input),
            kib(output)
        );

        Ok(report)
    }

    /// List what `run` would convert without touching any file
    pub async fn dry_run<W: Write>(&self, directory: &Path, out: &mut W) -> Result<Vec<String>> {
        let files = self.discover(directory).await?;

        writeln!(out, "{} files would be processed:", files.len())?;
        for filename in &files {
            writeln!(out, "  {} -> {}", filename, self.config().derive_output_name(filename))?;
        }

        Ok(files)
    }
}

impl Default for BatchConverter {
    fn default() -> Self {
        Self::new(ConversionConfig::default())
    }
}
