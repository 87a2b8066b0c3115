use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use swarm_calib_core::batch::{self, HeterogeneitySummary};
use swarm_calib_core::{DiffusionEstimate, ExperimentConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "swarm-calib")]
#[command(about = "Heterogeneity and CRW diffusion estimates for foraging model calibration")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Per-run and averaged cluster heterogeneity for an experiment
    Heterogeneity {
        /// Path to experiment file (JSON)
        #[arg(long)]
        config: PathBuf,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Searching and avoidance diffusion constants from averaged heterogeneity
    Diffusion {
        /// Path to experiment file (JSON)
        #[arg(long)]
        config: PathBuf,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Dump the default experiment configuration to stdout
    DumpDefaultConfig,
}

#[derive(Serialize)]
struct DiffusionReport<'a> {
    heterogeneity: &'a HeterogeneitySummary,
    searching: f64,
    avoiding: Option<f64>,
}

fn load_config(path: &Path) -> Result<ExperimentConfig> {
    let file = File::open(path).context("failed to open experiment file")?;
    let reader = BufReader::new(file);
    let config: ExperimentConfig =
        serde_json::from_reader(reader).context("failed to parse experiment file")?;
    config.validate().context("Experiment validation error")?;
    tracing::info!(
        path = %path.display(),
        scenario = %config.scenario,
        runs = config.runs.len(),
        "loaded experiment"
    );
    Ok(config)
}

fn print_heterogeneity(summary: &HeterogeneitySummary) {
    println!("Scenario:      {}", summary.scenario);
    for (run, value) in summary.per_run.iter().enumerate() {
        println!("  run {run:>3}:     {value:.6}");
    }
    println!("Heterogeneity: {:.6} (mean of {} runs)", summary.mean, summary.per_run.len());
}

fn print_diffusion(summary: &HeterogeneitySummary, estimate: &DiffusionEstimate) {
    print_heterogeneity(summary);
    println!("D searching:   {:.6}", estimate.searching);
    println!("D avoiding:    {}", format_optional(estimate.avoiding));
}

fn format_optional(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.6}"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::DumpDefaultConfig => {
            let config = ExperimentConfig::default();
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::Heterogeneity { config, json } => {
            let experiment = load_config(&config)?;
            let summary =
                batch::summarize(&experiment).context("heterogeneity computation failed")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_heterogeneity(&summary);
            }
        }
        Commands::Diffusion { config, json } => {
            let experiment = load_config(&config)?;
            let (summary, estimate) =
                batch::diffusion_for(&experiment).context("diffusion computation failed")?;
            if json {
                let report = DiffusionReport {
                    heterogeneity: &summary,
                    searching: estimate.searching,
                    avoiding: estimate.avoiding,
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_diffusion(&summary, &estimate);
            }
        }
    }
    Ok(())
}
