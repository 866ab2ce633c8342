use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use labbench::config::Defaults;
use labbench::orchestrator::runs::{RunDir, RunMetadata};
use labbench::orchestrator::{script, ExperimentConfig, ExperimentMode, Gpu, Orchestrator};
use labbench::tui::app::App;
use labbench::tui::runner::run_tui;

#[derive(Parser)]
#[command(name = "labbench", about = "Lab-notebook TUI for autonomous research runs.")]
struct Cli {
    /// Research objective. In single mode: the hypothesis to verify; in
    /// orchestrator mode: the high-level task. Omit it to type one into
    /// the start form instead.
    task: Option<String>,

    /// Execution mode: 'single' or 'orchestrator'.
    #[arg(long, default_value = "orchestrator")]
    mode: ExperimentMode,

    /// GPU type to request (any, t4, a10g, a100).
    #[arg(long)]
    gpu: Option<Gpu>,

    /// (orchestrator) Number of initial agents to launch.
    #[arg(long)]
    num_agents: Option<u32>,

    /// (orchestrator) Maximum number of orchestration rounds.
    #[arg(long)]
    max_rounds: Option<u32>,

    /// (orchestrator) Maximum experiments running in parallel.
    #[arg(long)]
    max_parallel: Option<u32>,

    /// Run with mock data (no LLM/GPU usage).
    #[arg(long)]
    test_mode: bool,

    /// Directory to store run artifacts (lab.log, metadata.json, paper.md).
    /// Defaults to runs/<task-slug>_<timestamp>.
    #[arg(long)]
    run_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let defaults = Defaults::load();

    // Run directory first — the log file lives in it.
    let run = match &cli.run_dir {
        Some(dir) => RunDir::at(dir.clone())?,
        None => {
            let base = defaults.runs_dir.clone().unwrap_or_else(|| "runs".into());
            RunDir::create(&base, cli.task.as_deref().unwrap_or("session"))?
        }
    };

    // The terminal belongs to the TUI, so structured logs go to the run
    // directory instead of stderr.
    let log_file = Arc::new(File::create(run.log_path())?);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("labbench=info".parse()?),
        )
        .with_writer(move || log_file.clone())
        .with_ansi(false)
        .init();

    // CLI flag → user config → built-in default.
    let template = ExperimentConfig {
        task: cli.task.clone().unwrap_or_default(),
        gpu: cli.gpu.or(defaults.gpu).unwrap_or_default(),
        num_agents: cli.num_agents.or(defaults.num_agents).unwrap_or(3),
        max_rounds: cli.max_rounds.or(defaults.max_rounds).unwrap_or(3),
        max_parallel: cli.max_parallel.or(defaults.max_parallel).unwrap_or(2),
        test_mode: cli.test_mode,
    };

    run.write_metadata(&RunMetadata {
        mode: cli.mode,
        config: template.clone(),
    })?;
    info!("labbench starting, run dir {}", run.path().display());

    let orchestrator = Orchestrator::new(script::engine(Duration::from_millis(400)))
        .with_run_dir(run.path().to_path_buf());

    let mut app = App::new(template, cli.mode);
    if let Some(task) = cli.task {
        // Task given on the command line: skip the form and start at once.
        app.task_input = task;
        app.submit();
    }

    run_tui(&orchestrator, app).await
}
