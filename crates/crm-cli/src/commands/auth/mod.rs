//! Auth subcommand implementations.

mod sign_in;
mod sign_out;
mod sign_up;
mod whoami;

use anyhow::Result;
use clap::{Args, Subcommand};
use tracing::debug;

use crmkit_core::{Credentials, Error, Identity, SessionProvider};

use crate::config::Config;

#[derive(Args, Debug)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthSubcommand {
    /// Register a new account and sign in
    SignUp(sign_up::SignUpArgs),

    /// Sign in to an existing account
    SignIn(sign_in::SignInArgs),

    /// Sign out of the current session
    SignOut(sign_out::SignOutArgs),

    /// Display the signed-in account
    Whoami(whoami::WhoamiArgs),
}

/// Email and password flags shared by sign-up and sign-in.
#[derive(Args, Debug)]
pub struct CredentialArgs {
    /// Account email address
    #[arg(long)]
    pub email: String,

    /// Account password
    #[arg(long, env = "CRM_PASSWORD", hide_env_values = true)]
    pub password: String,
}

impl CredentialArgs {
    fn credentials(&self) -> Credentials {
        Credentials::new(&self.email, &self.password)
    }
}

pub async fn handle(cmd: AuthCommand, config: &Config) -> Result<()> {
    let auth = config.open_auth()?;

    let _watch = auth.subscribe(Box::new(|identity: Option<&Identity>| match identity {
        Some(identity) => debug!(uid = %identity.uid, "Session active"),
        None => debug!("No session"),
    }));

    match cmd.command {
        AuthSubcommand::SignUp(args) => sign_up::run(args, &auth).await,
        AuthSubcommand::SignIn(args) => sign_in::run(args, &auth).await,
        AuthSubcommand::SignOut(args) => sign_out::run(args, &auth).await,
        AuthSubcommand::Whoami(args) => whoami::run(args, &auth, config),
    }
}

/// Attach the stable code to auth failures so scripts can match on it.
fn describe(err: Error) -> anyhow::Error {
    match err {
        Error::Auth(auth) => anyhow::anyhow!("{} ({})", auth, auth.code()),
        other => other.into(),
    }
}
