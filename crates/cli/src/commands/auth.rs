use std::io::Write as _;
use std::path::Path;

use anyhow::Result;
use tracing::warn;

use pollen_common::error::PollenError;
use pollen_core::client::is_allowed_upload;
use pollen_core::output::{LoginOutput, LogoutOutput, UploadOutput};
use pollen_utils::output::{render, OutputFormat};

use crate::factory::Context;

/// `pollen login <username>`: prompts for the password on stdin.
pub async fn login(ctx: &Context, username: &str, fmt: OutputFormat) -> Result<()> {
    eprint!("Password for {username}: ");
    std::io::stderr().flush().ok();

    let mut input = String::new();
    std::io::stdin()
        .read_line(&mut input)
        .map_err(|e| PollenError::Io(format!("Failed to read input: {e}")))?;
    let password = input.trim_end_matches(['\r', '\n']);

    if password.is_empty() {
        return Err(PollenError::InvalidInput("No password provided".into()).into());
    }

    let client = ctx.client()?;
    let token = client.login(username, password).await?;

    let token_stored = match ctx.token_store().save(&token) {
        Ok(()) => true,
        Err(e) => {
            warn!("session token not persisted: {e}");
            false
        }
    };

    let output = LoginOutput {
        username: username.to_string(),
        api_url: ctx.api_url.clone(),
        token_stored,
    };
    render(fmt, &output)
}

/// `pollen logout`
pub fn logout(ctx: &Context, fmt: OutputFormat) -> Result<()> {
    let token_cleared = ctx.token_store().clear()?;
    let output = LogoutOutput {
        api_url: ctx.api_url.clone(),
        token_cleared,
    };
    render(fmt, &output)
}

/// `pollen upload <file>`
pub async fn upload(ctx: &Context, file: &Path, fmt: OutputFormat) -> Result<()> {
    if !is_allowed_upload(file) {
        return Err(PollenError::UnsupportedFile(file.display().to_string()).into());
    }

    let client = ctx.client()?;
    let response = client.upload(file).await?;
    let output = UploadOutput {
        file: file.display().to_string(),
        response,
    };
    render(fmt, &output)
}
