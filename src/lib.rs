mod utils;

pub mod api;
pub mod charts;
pub mod history;
pub mod models;
pub mod settings;
pub mod view;
pub mod workflow;

#[cfg(test)]
mod testing;

use std::{path::PathBuf, sync::Arc};

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser};
use log::{info, warn};

use api::{AnalysisClient, SystemLauncher};
use settings::SettingsStore;
use workflow::{
    commands::{get_workflow_state, open_report, save_report, select_file, upload_selected},
    WorkflowController,
};

pub struct AppState {
    pub workflow: WorkflowController,
}

/// Options for the console front end.
#[derive(Debug, PartialEq, Parser)]
#[command(name = "equipviz")]
#[command(about = "Upload an equipment CSV for analysis and show the summary")]
pub struct ConsoleArgs {
    /// CSV file to upload. Without it only the upload history is shown.
    pub csv: Option<PathBuf>,
    /// Settings file with service URL and credentials.
    #[arg(long, default_value = "equipviz.json")]
    pub config: PathBuf,
    /// Open the PDF report in the default viewer.
    #[arg(long, default_value_t = false)]
    pub open_report: bool,
    /// Download the PDF report to this path.
    #[arg(long)]
    pub save_report: Option<PathBuf>,
}

pub fn run() -> Result<()> {
    // Initialize logging (reads RUST_LOG env var, defaults to info)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = ConsoleArgs::parse();

    info!("Equipment visualizer starting up...");

    // Single-threaded: every network call is awaited on one cooperative loop.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build async runtime")?;

    runtime.block_on(run_console(args))
}

async fn run_console(args: ConsoleArgs) -> Result<()> {
    let settings = SettingsStore::new(args.config.clone())?;
    let config = settings.client_config();
    info!(
        "Using analysis service at {} (loaded from {})",
        config.base_url,
        settings.path().display()
    );

    let client = AnalysisClient::new(config)?;
    let workflow = WorkflowController::new(Arc::new(client), Arc::new(SystemLauncher));
    let state = AppState {
        workflow: workflow.clone(),
    };

    workflow.start().await;

    match &args.csv {
        Some(path) => {
            select_file(&state, path.clone()).await.map_err(|e| anyhow!(e))?;
            upload_selected(&state).await.map_err(|e| anyhow!(e))?;
        }
        None => println!("{}\n", ConsoleArgs::command().render_usage()),
    }

    workflow.startup_complete().await;
    let snapshot = get_workflow_state(&state).await.map_err(|e| anyhow!(e))?;
    print!("{}", view::render_snapshot(&snapshot));

    if let Some(dest) = &args.save_report {
        match save_report(&state, dest.clone()).await {
            Ok(bytes) => println!("\nReport saved to {} ({bytes} bytes)", dest.display()),
            Err(err) => warn!("Could not save report: {err}"),
        }
    }
    if args.open_report {
        if let Err(err) = open_report(&state).await {
            warn!("Could not open report: {err}");
        }
    }

    workflow.shutdown();
    Ok(())
}
