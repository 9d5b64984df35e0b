//! Delete record command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crmkit_core::{Fields, RecordId, Repository};

use crate::output;

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Collection name
    pub collection: String,

    /// Record identifier
    pub id: String,
}

pub async fn run(args: DeleteArgs, repo: &Repository<Fields>) -> Result<()> {
    let id = RecordId::new(&args.id).context("Invalid record id")?;

    repo.delete(&id).await.context("Failed to delete record")?;

    output::success(&format!("Deleted record {}", id));
    Ok(())
}
