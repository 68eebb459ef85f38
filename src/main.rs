//! Assessgen · Assessment Generation Client
//!
//! - One-shot CLI: collect role/skills/difficulty, submit to the remote
//!   generation service, preview the result, optionally export artifacts
//! - The service is reached over HTTP only (see `client`)
//!
//! Important env variables:
//!   BACKEND_URL           : generation service base URL (default "http://127.0.0.1:8000")
//!   ASSESSGEN_CONFIG_PATH : path to TOML overlay (backend_url, request_timeout_secs, out_dir)
//!   LOG_LEVEL             : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT            : "pretty" (default) or "json"

mod client;
mod config;
mod controller;
mod error;
mod export;
mod form;
mod present;
mod protocol;
mod telemetry;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use crate::client::GenerationClient;
use crate::config::Config;
use crate::controller::{GenerationController, GenerationOutcome};
use crate::form::{Difficulty, FormState};

#[derive(Parser)]
#[command(name = "assessgen", about = "Generate a skills assessment via the generation service")]
struct Cli {
  /// Target role, e.g. "Product Analyst"
  #[arg(short, long, default_value = "")]
  role: String,

  /// Comma-separated skills, e.g. "SQL, Product-Metrics"
  #[arg(short, long, default_value = "")]
  skills: String,

  /// Assessment difficulty: easy | medium | hard
  #[arg(short, long, default_value = "medium", value_parser = form::parse_difficulty)]
  difficulty: Difficulty,

  /// Skip the mini-case section
  #[arg(long)]
  no_minicase: bool,

  /// Skip the aptitude section
  #[arg(long)]
  no_aptitude: bool,

  /// Write assessment.json and coverage_report.json after a successful run
  #[arg(long)]
  export: bool,

  /// Output directory for exported artifacts (defaults to the configured one)
  #[arg(long)]
  out_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
  telemetry::init_tracing();

  let cli = Cli::parse();
  let cfg = Config::load();

  let form = FormState {
    role: cli.role,
    skills: cli.skills,
    difficulty: cli.difficulty,
    include_minicase: !cli.no_minicase,
    include_aptitude: !cli.no_aptitude,
  };

  let controller = GenerationController::new(GenerationClient::new(&cfg));
  controller.generate(&form).await;

  match controller.outcome().await {
    GenerationOutcome::Success(result) => {
      println!("{}", present::render_preview(&present::preview(&result)));
      println!("Coverage Report");
      println!("{}", present::coverage_pretty(&result));

      if cli.export {
        let dir = cli.out_dir.unwrap_or_else(|| cfg.out_dir.clone());
        export::export_result(&dir, &result);
        info!(target: "assessgen", dir = %dir.display(), "Export finished");
      }
      ExitCode::SUCCESS
    }
    GenerationOutcome::Failure(message) => {
      error!(target: "assessgen", %message, "Generation failed");
      eprintln!("{message}");
      ExitCode::FAILURE
    }
    // One-shot driver: generate() has already returned, so the outcome is
    // terminal; these arms are unreachable here.
    GenerationOutcome::Idle | GenerationOutcome::Loading => ExitCode::FAILURE,
  }
}
