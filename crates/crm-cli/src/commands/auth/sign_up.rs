//! Sign-up command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crmkit_core::SessionProvider;
use crmkit_file::FileAuth;

use super::{CredentialArgs, describe};
use crate::output;

#[derive(Args, Debug)]
pub struct SignUpArgs {
    #[command(flatten)]
    pub credentials: CredentialArgs,
}

pub async fn run(args: SignUpArgs, auth: &FileAuth) -> Result<()> {
    let identity = auth
        .sign_up(args.credentials.credentials())
        .await
        .map_err(describe)
        .context("Sign-up failed")?;

    output::success("Account created and signed in");
    output::field("UID", &identity.uid);
    output::field("Email", &identity.email);

    Ok(())
}
