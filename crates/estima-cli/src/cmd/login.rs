use crate::cmd::{api_client, api_fail, load_state};
use crate::output::{render_success, OutputMode};
use anyhow::Result;
use clap::Args;
use estima_core::session::Auth;
use std::path::Path;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Portal username.
    pub username: String,

    /// Portal password. Falls back to the ESTIMA_PASSWORD env var.
    #[arg(long)]
    pub password: Option<String>,
}

/// Execute `est login`. Exchanges credentials for a portal token and stores
/// it in the session so later requests carry the auth cookie.
pub fn run_login(args: &LoginArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let password = match &args.password {
        Some(password) => password.clone(),
        None => std::env::var("ESTIMA_PASSWORD")
            .map_err(|_| anyhow::anyhow!("No password given. Pass --password or set ESTIMA_PASSWORD."))?,
    };

    let (config, mut session) = load_state(project_root)?;
    let client = api_client(&config, &session);

    let response = client
        .login(&args.username, &password)
        .map_err(|err| api_fail(&err))?;

    if !response.success || response.token.is_empty() {
        anyhow::bail!("Login rejected for user '{}'.", args.username);
    }

    session.auth = Some(Auth {
        user: args.username.clone(),
        token: response.token,
    });
    session.save(project_root)?;

    tracing::info!(user = %args.username, "logged in");
    render_success(output, &format!("Logged in as {}", args.username))
}
