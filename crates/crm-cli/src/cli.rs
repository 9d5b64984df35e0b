//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::commands::auth::AuthCommand;
use crate::commands::records::RecordsCommand;

/// Manage customers, projects, inventory and expenses from the terminal.
#[derive(Parser, Debug)]
#[command(name = "crm")]
#[command(author, version = env!("CRM_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where data lives.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Directory holding accounts, the session and the default local store
    #[arg(long, env = "CRM_HOME", global = true)]
    pub home: Option<PathBuf>,

    /// Document store URL (file:///path or https://host)
    #[arg(long, env = "CRM_STORE", global = true)]
    pub store: Option<String>,

    /// API key sent to an HTTP document store
    #[arg(long, env = "CRM_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Account and session operations
    Auth(AuthCommand),

    /// Record operations on a collection (requires sign-in)
    Records(RecordsCommand),
}
