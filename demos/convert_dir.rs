//! Convert one directory with the library API and print a summary

use std::path::PathBuf;
use webpify::{init_with_config, BatchConverter, ConversionConfig, LoggingConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_with_config(&LoggingConfig::default())?;

    // Directory to scan, e.g. `cargo run --example convert_dir -- deities`
    let directory = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("deities"));

    let converter = BatchConverter::new(ConversionConfig::new().quality(80));
    let report = converter.run(&directory, &mut std::io::stdout()).await?;

    let (input, output) = report.total_sizes();
    println!(
        "{} converted, {} skipped, {} failed ({} -> {} bytes)",
        report.converted(),
        report.skipped(),
        report.failed(),
        input,
        output
    );

    Ok(())
}
