//! Sign-in command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crmkit_core::SessionProvider;
use crmkit_file::FileAuth;

use super::{CredentialArgs, describe};
use crate::output;

#[derive(Args, Debug)]
pub struct SignInArgs {
    #[command(flatten)]
    pub credentials: CredentialArgs,
}

pub async fn run(args: SignInArgs, auth: &FileAuth) -> Result<()> {
    let identity = auth
        .sign_in(args.credentials.credentials())
        .await
        .map_err(describe)
        .context("Sign-in failed")?;

    output::success("Signed in");
    output::field("UID", &identity.uid);
    output::field("Email", &identity.email);

    Ok(())
}
