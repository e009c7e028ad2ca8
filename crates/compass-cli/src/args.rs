use std::path::PathBuf;

use clap::{Parser, Subcommand};
use compass_core::Language;

use crate::cli::{DraftCommands, PlanCommands, WizardCommands};

/// Command-line front end for the Compass strategic plan wizard
///
/// Compass walks a strategic plan through 18 steps, from context and vision
/// to governance and rollout. Plans are kept in a local SQLite database;
/// unsaved work is mirrored to a local draft file so it can be recovered.
#[derive(Parser)]
#[command(version, about, name = "compass")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/compass/compass.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Path to the local draft file. Defaults to
    /// $XDG_DATA_HOME/compass/draft.json
    #[arg(long, global = true)]
    pub draft_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Endpoint of the AI completion service
    #[arg(long, global = true, env = "COMPASS_AI_ENDPOINT")]
    pub ai_endpoint: Option<String>,

    /// Bearer token for the AI completion service
    #[arg(long, global = true, env = "COMPASS_AI_KEY", hide_env_values = true)]
    pub ai_key: Option<String>,

    /// Language the author works in (en or ar)
    #[arg(long, global = true, default_value = "en")]
    pub language: Language,

    /// Acting user, recorded as owner of new plans
    #[arg(long, global = true, env = "COMPASS_USER")]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for the Compass CLI
///
/// - `steps`: the wizard's step table
/// - `plan`: stored plans (list, show, delete, restore, export)
/// - `wizard`: one-shot wizard actions on a plan
/// - `draft`: the local recovery draft
#[derive(Subcommand)]
pub enum Commands {
    /// List the wizard steps
    Steps,
    /// Manage stored plans
    #[command(alias = "p")]
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Edit plans through the wizard
    #[command(alias = "w")]
    Wizard {
        #[command(subcommand)]
        command: WizardCommands,
    },
    /// Inspect or discard the local draft
    #[command(alias = "d")]
    Draft {
        #[command(subcommand)]
        command: DraftCommands,
    },
}
