//! Record subcommand implementations.
//!
//! Each command resolves its collection through the [`Collections`]
//! registry, so customers are validated and the rest are schemaless.

mod create;
mod delete;
mod get;
mod list;
mod update;

use std::io::{self, Read};

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};
use serde_json::Value;
use tracing::debug;

use crmkit_core::repo::COLLECTION_NAMES;
use crmkit_core::{Collections, Fields, Repository, RepositoryFactory, SessionProvider};

use crate::config::Config;

#[derive(Args, Debug)]
pub struct RecordsCommand {
    #[command(subcommand)]
    pub command: RecordsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum RecordsSubcommand {
    /// List records in a collection, one page at a time
    List(list::ListArgs),

    /// Fetch a single record
    Get(get::GetArgs),

    /// Create a new record
    Create(create::CreateArgs),

    /// Merge fields into an existing record
    Update(update::UpdateArgs),

    /// Delete a record
    Delete(delete::DeleteArgs),
}

impl RecordsSubcommand {
    fn collection(&self) -> &str {
        match self {
            RecordsSubcommand::List(args) => &args.collection,
            RecordsSubcommand::Get(args) => &args.collection,
            RecordsSubcommand::Create(args) => &args.collection,
            RecordsSubcommand::Update(args) => &args.collection,
            RecordsSubcommand::Delete(args) => &args.collection,
        }
    }
}

/// Record content given as a file, stdin, or inline.
#[derive(Args, Debug)]
pub struct FieldsInput {
    /// JSON file with the record fields (use - for stdin)
    #[arg(long, conflicts_with = "data")]
    pub json: Option<String>,

    /// Record fields as an inline JSON object
    #[arg(long)]
    pub data: Option<String>,
}

impl FieldsInput {
    fn read(&self) -> Result<Fields> {
        let value: Value = match (&self.json, &self.data) {
            (_, Some(data)) => serde_json::from_str(data).context("Invalid JSON in --data")?,
            (Some(path), None) if path == "-" => {
                let mut buf = String::new();
                io::stdin()
                    .read_to_string(&mut buf)
                    .context("Failed to read from stdin")?;
                serde_json::from_str(&buf).context("Invalid JSON from stdin")?
            }
            (Some(path), None) => {
                let content = std::fs::read_to_string(path).context("Failed to read JSON file")?;
                serde_json::from_str(&content).context("Invalid JSON in file")?
            }
            (None, None) => bail!("Provide record fields with --json <file> or --data '<json>'"),
        };

        match value {
            Value::Object(fields) => Ok(fields),
            other => bail!("Record fields must be a JSON object, got: {}", other),
        }
    }
}

pub async fn handle(cmd: RecordsCommand, config: &Config) -> Result<()> {
    let auth = config.open_auth()?;
    let identity = auth
        .current()
        .context("Not signed in. Run 'crm auth sign-in' first.")?;
    debug!(uid = %identity.uid, "Session gate passed");

    let factory = RepositoryFactory::new(config.open_store()?);
    let collections = Collections::new(&factory).context("Failed to set up collections")?;
    let repo = lookup(&collections, cmd.command.collection())?;

    match cmd.command {
        RecordsSubcommand::List(args) => list::run(args, repo).await,
        RecordsSubcommand::Get(args) => get::run(args, repo).await,
        RecordsSubcommand::Create(args) => create::run(args, repo).await,
        RecordsSubcommand::Update(args) => update::run(args, repo).await,
        RecordsSubcommand::Delete(args) => delete::run(args, repo).await,
    }
}

fn lookup<'a>(collections: &'a Collections, name: &str) -> Result<&'a Repository<Fields>> {
    collections.get(name).with_context(|| {
        format!(
            "Unknown collection '{}' (expected one of: {})",
            name,
            COLLECTION_NAMES.join(", ")
        )
    })
}
