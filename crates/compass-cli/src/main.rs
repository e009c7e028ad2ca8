//! Compass CLI
//!
//! Command-line front end for the strategic plan wizard. Every command opens
//! a short wizard session or store query, prints the outcome as markdown and
//! exits.

mod args;
mod cli;
mod handlers;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use compass_core::{params::ListPlans, AiConfig, FileDraftStore, PlanStoreBuilder};
use handlers::{Cli, Settings};
use log::info;
use renderer::TerminalRenderer;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        draft_file,
        no_color,
        ai_endpoint,
        ai_key,
        language,
        user,
        command,
    } = Args::parse();

    let store = PlanStoreBuilder::new()
        .with_database_path(database_file)
        .build()
        .await
        .context("Failed to initialize plan store")?;

    let drafts = match draft_file {
        Some(path) => FileDraftStore::new(path),
        None => FileDraftStore::default_location().context("Failed to locate draft file")?,
    };

    let settings = Settings {
        ai: AiConfig {
            endpoint: ai_endpoint,
            api_key: ai_key,
            ..Default::default()
        },
        language,
        user,
    };
    let cli = Cli::new(store, drafts, settings, TerminalRenderer::new(!no_color))?;

    info!("Compass started");

    match command {
        Some(Steps) => cli.show_steps(),
        Some(Plan { command }) => cli.handle_plan_command(command).await,
        Some(Wizard { command }) => cli.handle_wizard_command(command).await,
        Some(Draft { command }) => cli.handle_draft_command(command).await,
        None => cli.list_plans(&ListPlans::default()).await,
    }
}
