//! Create record command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crmkit_core::{Fields, Repository};

use super::FieldsInput;
use crate::output;

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Collection name
    pub collection: String,

    #[command(flatten)]
    pub input: FieldsInput,
}

pub async fn run(args: CreateArgs, repo: &Repository<Fields>) -> Result<()> {
    let fields = args.input.read()?;

    let id = repo
        .create(&fields)
        .await
        .context("Failed to create record")?;

    println!("{}", id);
    output::success(&format!("Created record {} in {}", id, repo.collection()));

    Ok(())
}
