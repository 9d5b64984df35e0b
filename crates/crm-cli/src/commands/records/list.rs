//! List records command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crmkit_core::{Cursor, Fields, ListOptions, Repository};

use crate::output;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Collection name
    pub collection: String,

    /// Maximum number of records to return
    #[arg(long)]
    pub limit: Option<u32>,

    /// Cursor printed by a previous page
    #[arg(long)]
    pub cursor: Option<String>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(args: ListArgs, repo: &Repository<Fields>) -> Result<()> {
    let mut options = ListOptions::new();
    if let Some(limit) = args.limit {
        options = options.limit(limit);
    }
    if let Some(token) = &args.cursor {
        let cursor: Cursor = token.parse().context("Invalid cursor")?;
        options = options.after(cursor);
    }

    let page = repo
        .get_all(options)
        .await
        .context("Failed to list records")?;

    if page.is_empty() {
        output::hint("No records found.");
    }

    for record in &page {
        if args.pretty {
            output::json_pretty(record)?;
        } else {
            output::json(record)?;
        }
    }

    if let Some(cursor) = &page.cursor {
        output::hint(&format!("Next cursor: {}", cursor));
    }

    Ok(())
}
