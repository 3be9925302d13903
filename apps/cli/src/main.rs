mod config;
mod context;
mod errors;
mod export;
mod extract;
mod generation;
mod llm_client;
mod profile;
mod session;
mod ui;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::context::checkpoint::JsonFileCheckpoint;
use crate::errors::{AppError, EXIT_ABANDONED};
use crate::export::{JsonlSessionLog, LetterExporter};
use crate::llm_client::LlmClient;
use crate::profile::FileProfileLoader;
use crate::session::runner::SessionRunner;
use crate::session::SessionState;
use crate::ui::{ConsolePrompt, Ui};

/// Generate a tailored cover letter for one job listing and refine it
/// interactively until you approve it.
#[derive(Debug, Parser)]
#[command(name = "coverforge", version)]
struct Cli {
    /// Job listing text file (defaults to the configured path)
    #[arg(long)]
    job_file: Option<PathBuf>,

    /// Discard any saved conversation and start fresh
    #[arg(long)]
    fresh: bool,

    /// Directory holding resume, skills, and criteria files
    #[arg(long)]
    profile_dir: Option<PathBuf>,

    /// Root directory for exported cover letters
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e:#}");
            return ExitCode::from(1);
        }
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting coverforge v{}", env!("CARGO_PKG_VERSION"));

    let profile_dir = cli.profile_dir.unwrap_or_else(|| config.profile_dir.clone());
    let output_dir = cli.output_dir.unwrap_or_else(|| config.output_dir.clone());
    let job_path = cli.job_file.unwrap_or_else(|| config.job_file.clone());

    let ui = Ui::new();
    ui.banner();

    match run(&config, &ui, profile_dir, output_dir, job_path, cli.fresh).await {
        Ok(SessionState::Approved) => ExitCode::SUCCESS,
        Ok(SessionState::Abandoned) => ExitCode::from(EXIT_ABANDONED as u8),
        Ok(other) => {
            error!("session ended in unexpected state {}", other.name());
            ExitCode::from(1)
        }
        Err(e) => {
            error!(kind = e.kind(), "session failed: {e}");
            ui.error(&format!("{e}"));
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

async fn run(
    config: &Config,
    ui: &Ui,
    profile_dir: PathBuf,
    output_dir: PathBuf,
    job_path: PathBuf,
    fresh: bool,
) -> Result<SessionState, AppError> {
    // Profile loads first so missing inputs abort before any API spend.
    ui.section("Loading profile");
    let profile = FileProfileLoader::new(&profile_dir).load()?;
    ui.info(&format!(
        "Loaded resume, {} skills, and writing criteria from {}",
        profile.skills.len(),
        profile_dir.display()
    ));

    let client = LlmClient::new(config.anthropic_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let checkpoint = JsonFileCheckpoint::new(&config.context_path);
    let log = JsonlSessionLog::new(&config.session_log_path);
    let exporter = LetterExporter::new(&output_dir);
    let mut prompt = ConsolePrompt::new()?;

    let runner = SessionRunner {
        client: &client,
        checkpoint: &checkpoint,
        log: &log,
        exporter: &exporter,
        ui,
        max_refinements: config.max_refinements,
    };

    runner.run(&profile, &job_path, &mut prompt, fresh).await
}
