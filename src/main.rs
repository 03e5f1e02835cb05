use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ecosystem_check::artifacts::report::{self, OutputFormat};
use ecosystem_check::commands::check::run_check;
use ecosystem_check::commands::compare::FormatComparison;
use ecosystem_check::projects::Project;
use ecosystem_check::projects::defaults::default_targets;

#[derive(Parser)]
#[command(
    name = "ecosystem-check",
    version,
    about = "Check two versions of djangofmt against a corpus of open-source code"
)]
struct Cli {
    /// The known-good formatter executable.
    baseline_executable: PathBuf,
    /// The candidate formatter executable.
    comparison_executable: PathBuf,
    /// Type of comparison to make when checking formatting.
    #[arg(long, value_enum, default_value_t = FormatComparison::BaseAndComp)]
    format_comparison: FormatComparison,
    /// Location for caching cloned repositories.
    #[arg(long)]
    cache: Option<PathBuf>,
    /// How to render the result.
    #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
    output_format: OutputFormat,
    /// Force preview mode to be enabled for all projects.
    #[arg(long)]
    force_preview: bool,
    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", "ecosystem-check failed".red().bold());
            for cause in err.chain() {
                eprintln!("  {} {cause}", "Cause:".bold());
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let baseline = resolve_executable(&cli.baseline_executable, "baseline")?;
    let comparison = resolve_executable(&cli.comparison_executable, "comparison")?;

    let mut targets = default_targets();
    if cli.force_preview {
        targets = targets.iter().map(Project::with_preview_enabled).collect();
    }

    // Clones land in a temporary directory unless a cache is provided;
    // the guard keeps it alive for the whole run.
    let temp_cache = match &cli.cache {
        Some(_) => None,
        None => Some(tempfile::tempdir().context("failed to create a temporary cache")?),
    };
    let cache = match (&cli.cache, &temp_cache) {
        (Some(cache), _) => cache.clone(),
        (None, Some(dir)) => dir.path().to_path_buf(),
        (None, None) => unreachable!(),
    };

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        });
    }

    let result = run_check(
        &baseline,
        &comparison,
        targets,
        cli.format_comparison,
        &cache,
        &cancel,
    )
    .await;

    println!("{}", report::render(&result, cli.output_format)?);
    Ok(())
}

/// Use the given path as-is when it exists, otherwise look the executable
/// up on `PATH`. The result is absolute because formatters run with their
/// working directory set to the checkout.
fn resolve_executable(executable: &Path, kind: &str) -> Result<PathBuf> {
    if executable.exists() {
        return executable
            .canonicalize()
            .with_context(|| format!("failed to canonicalize {}", executable.display()));
    }

    if let Some(paths) = std::env::var_os("PATH") {
        for dir in std::env::split_paths(&paths) {
            let candidate = dir.join(executable);
            if candidate.is_file() {
                info!(
                    "Resolved {kind} executable {} to {}",
                    executable.display(),
                    candidate.display()
                );
                return Ok(candidate);
            }
        }
    }

    bail!("could not find {kind} executable: {}", executable.display())
}

fn setup_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("ecosystem_check={level}"))),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
