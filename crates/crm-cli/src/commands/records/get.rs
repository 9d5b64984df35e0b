//! Get record command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crmkit_core::{Fields, RecordId, Repository};

use crate::output;

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Collection name
    pub collection: String,

    /// Record identifier
    pub id: String,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(args: GetArgs, repo: &Repository<Fields>) -> Result<()> {
    let id = RecordId::new(&args.id).context("Invalid record id")?;

    let record = repo
        .get_by_id(&id)
        .await
        .context("Failed to fetch record")?
        .with_context(|| format!("No record {} in {}", id, repo.collection()))?;

    if args.pretty {
        output::json_pretty(&record)
    } else {
        output::json(&record)
    }
}
