//! Sign-out command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crmkit_core::SessionProvider;
use crmkit_file::FileAuth;

use super::describe;
use crate::output;

#[derive(Args, Debug)]
pub struct SignOutArgs {}

pub async fn run(_args: SignOutArgs, auth: &FileAuth) -> Result<()> {
    auth.sign_out()
        .await
        .map_err(describe)
        .context("Sign-out failed")?;

    output::success("Signed out");
    Ok(())
}
