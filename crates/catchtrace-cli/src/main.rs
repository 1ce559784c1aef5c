use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use catchtrace_core::{ConfigError, PathConfig};
use catchtrace_generate::{GenerateOptions, GenerationEngine, GenerationError};

#[derive(Debug, Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

#[derive(Parser, Debug)]
#[command(name = "catchtrace", version, about = "Synthetic seafood traceability dataset generator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Generate(GenerateArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Role digits, one per path position (1=vessel .. 6=retailer).
    #[arg(long, default_value = "123456")]
    pis: String,
    /// Merge factor per position, 0 = none. Defaults to all zeros.
    #[arg(long)]
    merge_gtin: Option<String>,
    /// Output-product split factor per position, 0 = none. Defaults to all zeros.
    #[arg(long)]
    split_gtin: Option<String>,
    /// Downstream-path split factor per position, 0/1 = none. Defaults to all zeros.
    #[arg(long)]
    split_pi: Option<String>,
    /// Number of independent sample paths.
    #[arg(long, default_value_t = 20)]
    sample_num: u32,
    /// Reuse the first drawn participant for every branch at a fan-out point.
    #[arg(long, default_value_t = false)]
    same_pis: bool,
    /// Directory under which the run directory is created.
    #[arg(long, default_value = "data")]
    out_dir: PathBuf,
    /// Master seed; runs with the same seed produce identical datasets.
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Calendar date of the origin catches (YYYY-MM-DD).
    #[arg(long, default_value = "2024-01-01")]
    base_date: NaiveDate,
}

fn main() -> Result<(), CliError> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Command::Generate(args) => run_generate(args),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run_generate(args: GenerateArgs) -> Result<(), CliError> {
    if args.sample_num == 0 {
        return Err(CliError::InvalidArgument(
            "sample_num must be positive".to_string(),
        ));
    }

    let zeros = "0".repeat(args.pis.len());
    let merge = args.merge_gtin.unwrap_or_else(|| zeros.clone());
    let split_gtin = args.split_gtin.unwrap_or_else(|| zeros.clone());
    let split_pi = args.split_pi.unwrap_or(zeros);

    let config = PathConfig::parse(&args.pis, &merge, &split_gtin, &split_pi, args.same_pis)?;
    let options = GenerateOptions {
        out_dir: args.out_dir,
        samples: args.sample_num,
        seed: args.seed,
        base_date: args.base_date,
    };

    let result = GenerationEngine::new(options).run(&config)?;

    println!("run directory: {}", result.run_dir.display());
    for batch in &result.report.batches {
        println!(
            "  {} ({} rows, {} bytes)",
            batch.file, batch.rows, batch.bytes
        );
    }
    println!(
        "{} events across {} paths in {} ms",
        result.report.total_events, result.report.paths_generated, result.report.duration_ms
    );
    Ok(())
}
