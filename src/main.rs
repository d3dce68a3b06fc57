//! Webpify CLI - batch PNG to WebP converter
//!
//! Converts every `.png` file in a directory to a lossy WebP sibling and prints
//! one line per file with the size change.

use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use tracing::info;

use webpify::{init_with_config, BatchConverter, Config, NamingMode, OverwritePolicy};

/// Webpify - batch PNG to WebP converter
#[derive(Parser)]
#[command(
    name = "webpify",
    version,
    about = "Convert every PNG in a directory to WebP",
    long_about = "Webpify scans a directory (not recursively) for files ending in .png, \
                  writes a lossy WebP copy next to each one and reports the size change. \
                  Files that fail to convert are reported and skipped.",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory to scan
    #[arg(value_name = "DIRECTORY", env = "WEBPIFY_DIR", default_value = "deities")]
    directory: PathBuf,

    /// WebP quality (0-100) [default: 80]
    #[arg(short, long, value_name = "QUALITY", value_parser = clap::value_parser!(u8).range(0..=100))]
    quality: Option<u8>,

    /// What to do when the WebP file already exists [default: overwrite]
    #[arg(long, value_enum, value_name = "POLICY")]
    overwrite: Option<CliOverwritePolicy>,

    /// How the output name is derived [default: substring]
    #[arg(long, value_enum, value_name = "MODE")]
    naming: Option<CliNamingMode>,

    /// Remove each PNG after it was converted successfully
    #[arg(long)]
    delete_source: bool,

    /// Configuration file path (.toml or .yaml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Show what would be converted without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Print the run report as JSON instead of per-file lines
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short = 'Q', long, conflicts_with = "verbose")]
    quiet: bool,
}

/// Available subcommands
#[derive(Subcommand)]
enum Commands {
    /// Validate configuration file
    Config {
        /// Configuration file to validate
        file: PathBuf,
    },
    /// Generate example configuration file
    ExampleConfig {
        /// Output file path
        #[arg(short, long, default_value = "webpify.toml")]
        output: PathBuf,
        /// Use YAML format instead of TOML
        #[arg(long)]
        yaml: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliOverwritePolicy {
    Overwrite,
    Skip,
    Error,
}

impl From<CliOverwritePolicy> for OverwritePolicy {
    fn from(policy: CliOverwritePolicy) -> Self {
        match policy {
            CliOverwritePolicy::Overwrite => OverwritePolicy::Overwrite,
            CliOverwritePolicy::Skip => OverwritePolicy::Skip,
            CliOverwritePolicy::Error => OverwritePolicy::Error,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliNamingMode {
    Substring,
    Suffix,
}

impl From<CliNamingMode> for NamingMode {
    fn from(mode: CliNamingMode) -> Self {
        match mode {
            CliNamingMode::Substring => NamingMode::Substring,
            CliNamingMode::Suffix => NamingMode::Suffix,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.quiet {
        std::env::set_var("RUST_LOG", "error");
    } else if cli.verbose {
        std::env::set_var("RUST_LOG", "debug");
    }

    if let Some(command) = &cli.command {
        if let Err(e) = handle_subcommand(command) {
            eprintln!("{}: {:#}", style("Error").red().bold(), e);
            process::exit(1);
        }
        return;
    }

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {:#}", style("Error").red().bold(), e);
            process::exit(1);
        }
    };

    if let Err(e) = init_with_config(&config.logging) {
        eprintln!("{}: Failed to initialize logging: {}", style("Error").red().bold(), e);
        process::exit(1);
    }

    if let Err(e) = run(&cli, config).await {
        eprintln!("{}: {:#}", style("Error").red().bold(), e);
        process::exit(1);
    }
}

/// Handle subcommands
fn handle_subcommand(command: &Commands) -> anyhow::Result<()> {
    match command {
        Commands::Config { file } => validate_config_file(file),
        Commands::ExampleConfig { output, yaml } => generate_example_config(output, *yaml),
    }
}

/// Build the effective configuration: file (if any), then CLI overrides
fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load configuration {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(quality) = cli.quality {
        config.conversion.quality = quality;
    }
    if let Some(policy) = cli.overwrite {
        config.conversion.overwrite = policy.into();
    }
    if let Some(mode) = cli.naming {
        config.conversion.naming = mode.into();
    }
    if cli.delete_source {
        config.conversion.delete_source = true;
    }

    config.validate()?;
    Ok(config)
}

/// Convert the target directory
async fn run(cli: &Cli, config: Config) -> anyhow::Result<()> {
    let converter = BatchConverter::new(config.conversion);

    if cli.dry_run {
        converter.dry_run(&cli.directory, &mut std::io::stdout()).await?;
        return Ok(());
    }

    if cli.json {
        let report = converter.run(&cli.directory, &mut std::io::sink()).await?;
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        converter.run(&cli.directory, &mut std::io::stdout()).await?;
    }

    info!("Finished {}", cli.directory.display());
    Ok(())
}

/// Validate configuration file
fn validate_config_file(file_path: &Path) -> anyhow::Result<()> {
    let config = Config::from_file(file_path)?;
    config.validate()?;

    println!("{}: Configuration file is valid", style("Success").green().bold());
    println!("Quality: {}", config.conversion.quality);
    println!("Naming: {:?}", config.conversion.naming);
    println!("Overwrite: {:?}", config.conversion.overwrite);

    Ok(())
}

/// Generate example configuration file
fn generate_example_config(output_path: &Path, use_yaml: bool) -> anyhow::Result<()> {
    let output_path = if use_yaml {
        output_path.with_extension("yaml")
    } else {
        output_path.to_path_buf()
    };

    Config::default().to_file(&output_path)?;

    let format = if use_yaml { "YAML" } else { "TOML" };
    println!(
        "{}: Generated example {} configuration: {}",
        style("Success").green().bold(),
        format,
        output_path.display()
    );

    Ok(())
}
