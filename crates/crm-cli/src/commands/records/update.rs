//! Update record command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crmkit_core::{Fields, RecordId, Repository};

use super::FieldsInput;
use crate::output;

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Collection name
    pub collection: String,

    /// Record identifier
    pub id: String,

    #[command(flatten)]
    pub input: FieldsInput,
}

pub async fn run(args: UpdateArgs, repo: &Repository<Fields>) -> Result<()> {
    let id = RecordId::new(&args.id).context("Invalid record id")?;
    let patch = args.input.read()?;

    repo.update(&id, &patch)
        .await
        .context("Failed to update record")?;

    output::success(&format!("Updated record {}", id));
    Ok(())
}
