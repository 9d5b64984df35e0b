//! Whoami command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crmkit_core::SessionProvider;
use crmkit_file::FileAuth;

use crate::config::Config;
use crate::output;

#[derive(Args, Debug)]
pub struct WhoamiArgs {}

pub fn run(_args: WhoamiArgs, auth: &FileAuth, config: &Config) -> Result<()> {
    let identity = auth
        .current()
        .context("Not signed in. Run 'crm auth sign-in' first.")?;

    output::field("UID", &identity.uid);
    output::field("Email", &identity.email);
    output::field("Store", config.store_url().as_str());
    output::field("Home", &config.home().display().to_string());

    Ok(())
}
