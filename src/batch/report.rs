//! Per-file console lines and the serializable run report

use std::path::PathBuf;
use serde::Serialize;

use crate::error::{ConversionError, ConversionErrorKind};
use crate::processing::{ConversionOutcome, ConversionReport};

/// Bytes to KiB
pub fn kib(bytes: u64) -> f64 {
    bytes as f64 / 1024.0
}

/// Result for one selected file
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    /// Source filename as listed in the directory
    pub filename: String,

    /// Derived output filename
    pub output: String,

    #[serde(flatten)]
    pub status: FileStatus,
}

/// How a selected file ended
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    Converted {
        original_size: u64,
        converted_size: u64,
        reduction_percent: f64,
        source_removed: bool,
    },
    Skipped,
    Failed {
        kind: ConversionErrorKind,
        message: String,
    },
}

impl FileReport {
    /// Build the report for a file from the engine's per-file result
    pub fn new(
        filename: String,
        output: String,
        result: &Result<ConversionOutcome, ConversionError>,
    ) -> Self {
        let status = match result {
            Ok(ConversionOutcome::Converted(report)) => FileStatus::from(report),
            Ok(ConversionOutcome::Skipped { .. }) => FileStatus::Skipped,
            Err(e) => FileStatus::Failed {
                kind: e.kind(),
                message: e.to_string(),
            },
        };

        Self { filename, output, status }
    }

    /// The human-readable line printed for this file
    pub fn console_line(&self) -> String {
        match &self.status {
            FileStatus::Converted {
                original_size,
                converted_size,
                reduction_percent,
                ..
            } => format!(
                "Compressed {}: {:.1}KB -> {:.1}KB ({:.1}% reduction)",
                self.filename,
                kib(*original_size),
                kib(*converted_size),
                reduction_percent
            ),
            FileStatus::Skipped => {
                format!("Skipped {}: {} already exists", self.filename, self.output)
            }
            FileStatus::Failed { message, .. } => {
                format!("Error processing {}: {}", self.filename, message)
            }
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, FileStatus::Failed { .. })
    }
}

impl From<&ConversionReport> for FileStatus {
    fn from(report: &ConversionReport) -> Self {
        Self::Converted {
            original_size: report.original_size,
            converted_size: report.converted_size,
            reduction_percent: report.size_reduction(),
            source_removed: report.source_removed,
        }
    }
}

/// Everything a batch run did, in processing order
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub directory: PathBuf,
    pub files: Vec<FileReport>,
}

impl BatchReport {
    pub fn new(directory: PathBuf) -> Self {
        Self {
            directory,
            files: Vec::new(),
        }
    }

    pub fn converted(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.status, FileStatus::Converted { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.status, FileStatus::Skipped))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.files.iter().filter(|f| f.is_failed()).count()
    }

    /// Total (original, converted) bytes over converted files
    pub fn total_sizes(&self) -> (u64, u64) {
        self.files.iter().fold((0, 0), |(input, output), file| match file.status {
            FileStatus::Converted {
                original_size,
                converted_size,
                ..
            } => (input + original_size, output + converted_size),
            _ => (input, output),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn converted(original_size: u64, converted_size: u64) -> FileReport {
        let report = ConversionReport {
            source: PathBuf::from("deities/zeus.png"),
            destination: PathBuf::from("deities/zeus.webp"),
            width: 64,
            height: 64,
            original_size,
            converted_size,
            processing_time: Duration::from_millis(3),
            source_removed: false,
        };
        FileReport::new(
            "zeus.png".to_string(),
            "zeus.webp".to_string(),
            &Ok(ConversionOutcome::Converted(report)),
        )
    }

    #[test]
    fn test_success_line_format() {
        let line = converted(2048, 512).console_line();
        assert_eq!(line, "Compressed zeus.png: 2.0KB -> 0.5KB (75.0% reduction)");
    }

    #[test]
    fn test_success_line_rounds_to_one_decimal() {
        // 1000 B = 0.9765625 KiB, 333 B = 0.3251953125 KiB, 66.7% reduction
        let line = converted(1000, 333).console_line();
        assert_eq!(line, "Compressed zeus.png: 1.0KB -> 0.3KB (66.7% reduction)");
    }

    #[test]
    fn test_growth_reported_as_negative_reduction() {
        let line = converted(1000, 1500).console_line();
        assert!(line.ends_with("(-50.0% reduction)"));
    }

    #[test]
    fn test_failure_line_names_file() {
        let err = ConversionError::DestinationExists {
            path: PathBuf::from("deities/hera.webp"),
        };
        let report = FileReport::new("hera.png".to_string(), "hera.webp".to_string(), &Err(err));

        assert!(report.is_failed());
        assert!(report.console_line().starts_with("Error processing hera.png: "));
        assert!(report.console_line().contains("already exists"));
    }

    #[test]
    fn test_batch_totals() {
        let mut batch = BatchReport::new(PathBuf::from("deities"));
        batch.files.push(converted(1000, 400));
        batch.files.push(converted(3000, 600));
        batch.files.push(FileReport::new(
            "ares.png".to_string(),
            "ares.webp".to_string(),
            &Ok(ConversionOutcome::Skipped {
                destination: PathBuf::from("deities/ares.webp"),
            }),
        ));

        assert_eq!(batch.converted(), 2);
        assert_eq!(batch.skipped(), 1);
        assert_eq!(batch.failed(), 0);
        assert_eq!(batch.total_sizes(), (4000, 1000));
    }

    #[test]
    fn test_json_shape() {
        let value = serde_json::to_value(converted(2048, 1024)).unwrap();
        assert_eq!(value["filename"], "zeus.png");
        assert_eq!(value["status"], "converted");
        assert_eq!(value["converted_size"], 1024);
        assert_eq!(value["reduction_percent"], 50.0);
    }
}
