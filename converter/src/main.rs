//! csv2opencontrol CLI - Convert a control CSV export to an OpenControl repository
//!
//! ```bash
//! csv2opencontrol exported_controls.csv
//! csv2opencontrol exported_controls.tsv --output outputs/vdp_opencontrol --limit 50
//! ```
//!
//! System metadata can also come from the environment (or a `.env` file):
//! `OPENCONTROL_SYSTEM_NAME`, `OPENCONTROL_ORGANIZATION_NAME`,
//! `OPENCONTROL_ABBREVIATION`, `OPENCONTROL_DESCRIPTION`.

use clap::Parser;
use csv2opencontrol::config::DEFAULT_OUTPUT_ROOT;
use csv2opencontrol::{convert_file, ConversionConfig, RunLog, SystemMetadata};
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "csv2opencontrol")]
#[command(about = "Convert a security-control CSV export into OpenControl YAML", long_about = None)]
struct Cli {
    /// Input CSV (or TSV) file
    input: PathBuf,

    /// Root of the generated OpenControl repository
    #[arg(short, long, default_value = DEFAULT_OUTPUT_ROOT, env = "OPENCONTROL_OUTPUT")]
    output: PathBuf,

    /// Only read the first N data rows
    #[arg(short, long)]
    limit: Option<usize>,

    /// CSV delimiter (auto-detect if not specified)
    #[arg(short, long)]
    delimiter: Option<char>,

    /// Split the evidence column on this string
    #[arg(long)]
    evidence_delimiter: Option<String>,

    #[arg(long, env = "OPENCONTROL_SYSTEM_NAME")]
    system_name: Option<String>,

    #[arg(long, env = "OPENCONTROL_ORGANIZATION_NAME")]
    organization_name: Option<String>,

    #[arg(long, env = "OPENCONTROL_ABBREVIATION")]
    abbreviation: Option<String>,

    #[arg(long, env = "OPENCONTROL_DESCRIPTION")]
    description: Option<String>,

    /// Write the run log as JSON to this file
    #[arg(long)]
    log_json: Option<PathBuf>,

    /// Don't echo progress to stderr
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = build_config(&cli)?;
    let mut log = if cli.quiet { RunLog::quiet() } else { RunLog::new() };

    let result = convert_file(&cli.input, &config, &mut log);

    if let Some(path) = &cli.log_json {
        fs::write(path, log.to_json()?)?;
    }

    let summary = result?;
    if !cli.quiet {
        eprintln!(
            "\n✨ Done! {} rows → {} family files in {} components ({} warnings)",
            summary.rows,
            summary.family_files.len(),
            summary.components.len(),
            summary.warnings
        );
    }
    Ok(())
}

fn build_config(cli: &Cli) -> Result<ConversionConfig, Box<dyn std::error::Error>> {
    let delimiter = match cli.delimiter {
        Some(c) if c.is_ascii() => Some(c as u8),
        Some(c) => return Err(format!("Delimiter must be a single ASCII character, got '{}'", c).into()),
        None => None,
    };

    let defaults = SystemMetadata::default();
    let system = SystemMetadata {
        name: cli.system_name.clone().unwrap_or(defaults.name),
        organization_name: cli
            .organization_name
            .clone()
            .unwrap_or(defaults.organization_name),
        abbreviation: cli.abbreviation.clone().unwrap_or(defaults.abbreviation),
        description: cli.description.clone().unwrap_or(defaults.description),
        ..defaults
    };

    Ok(ConversionConfig::default()
        .with_output_root(&cli.output)
        .with_row_limit(cli.limit)
        .with_delimiter(delimiter)
        .with_evidence_delimiter(cli.evidence_delimiter.clone())
        .with_system(system))
}
