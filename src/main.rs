use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use argument_miner::export::{self, ExportFormat};
use argument_miner::history::{self, History};
use argument_miner::input::read_upload;
use argument_miner::{analyze, analyze_with_rng, AnalysisResult};
use chrono::Utc;
use clap::{Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Csv,
    Report,
}

impl From<Format> for ExportFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Json => ExportFormat::Json,
            Format::Csv => ExportFormat::Csv,
            Format::Report => ExportFormat::Report,
        }
    }
}

#[derive(Parser)]
#[command(
    name = "argmine",
    about = "Identify arguments, claims and evidence in prose",
    version
)]
struct Cli {
    /// Files to analyze (reads stdin if none provided)
    files: Vec<PathBuf>,

    /// Export format
    #[arg(short, long, value_enum, default_value = "json")]
    format: Format,

    /// Seed the confidence jitter for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Write exports into this directory instead of stdout
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Print the recent-analysis history to stderr when done
    #[arg(long)]
    history: bool,
}

fn emit(result: &AnalysisResult, format: ExportFormat, output_dir: Option<&Path>) -> Result<()> {
    let now = Utc::now();
    let rendered = export::render(result, format, now).context("Failed to serialize result")?;

    match output_dir {
        Some(dir) => {
            let path = dir.join(format.file_name(now.timestamp_millis()));
            std::fs::write(&path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "Export written");
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let format = ExportFormat::from(cli.format);
    let mut rng = cli.seed.map(StdRng::seed_from_u64);
    let mut history = History::new();
    let mut failed = false;

    let inputs: Vec<(String, String)> = if cli.files.is_empty() {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        vec![("<stdin>".to_string(), text)]
    } else {
        let mut inputs = Vec::new();
        for path in &cli.files {
            match read_upload(path) {
                Ok(text) => inputs.push((path.display().to_string(), text)),
                Err(e) => {
                    tracing::error!(path = %path.display(), error = ?e, "Upload rejected");
                    eprintln!("{}: {e}", path.display());
                    failed = true;
                }
            }
        }
        inputs
    };

    for (name, text) in inputs {
        if text.trim().is_empty() {
            tracing::warn!(input = %name, "Skipping empty input");
            continue;
        }

        let result = match rng.as_mut() {
            Some(rng) => analyze_with_rng(&text, rng),
            None => analyze(&text),
        };
        tracing::info!(
            input = %name,
            id = %result.id,
            arguments = result.arguments.len(),
            claims = result.claims.len(),
            "Analyzed"
        );

        emit(&result, format, cli.output_dir.as_deref())?;
        history.push(result);
    }

    if cli.history {
        for (i, entry) in history.iter().enumerate() {
            eprintln!("{}. {}", i + 1, history::summary_line(entry));
        }
    }

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
