use anyhow::Result;

use pollen_core::client::parse_base_url;
use pollen_core::output::ConfigOutput;
use pollen_utils::output::{render, OutputFormat};

use crate::factory::{parse_mode, Context};

/// `pollen configure show`: effective settings, overrides applied.
pub fn show(ctx: &Context, fmt: OutputFormat) -> Result<()> {
    let logged_in = matches!(ctx.token_store().load(), Ok(Some(_)));
    let output = ConfigOutput {
        config_path: pollen_core::workspace::config_path()?.display().to_string(),
        api_url: ctx.api_url.clone(),
        timeout_secs: ctx.config.api.timeout_secs,
        verbose: ctx.config.system.verbose,
        mode: ctx.mode(None)?,
        logged_in,
    };

    render(fmt, &output)?;

    if fmt == OutputFormat::Table {
        println!();
        println!("Tip: Edit settings with `pollen configure url|verbose|mode|timeout`.");
    }

    Ok(())
}

/// `pollen configure url <url>`
pub fn set_url(url: &str) -> Result<()> {
    let parsed = parse_base_url(url)?;
    let mut config = pollen_core::workspace::load_config()?;
    config.api.url = parsed.as_str().trim_end_matches('/').to_string();
    pollen_core::workspace::save_config(&config)?;
    println!("✓ API URL set to {}", config.api.url);
    Ok(())
}

/// `pollen configure verbose <bool>`
pub fn set_verbose(enabled: bool) -> Result<()> {
    let mut config = pollen_core::workspace::load_config()?;
    config.system.verbose = enabled;
    pollen_core::workspace::save_config(&config)?;
    println!("✓ verbose = {enabled}");
    Ok(())
}

/// `pollen configure mode <mode>`
pub fn set_mode(mode: &str) -> Result<()> {
    let mode = parse_mode(mode)?;
    let mut config = pollen_core::workspace::load_config()?;
    config.system.mode = mode;
    pollen_core::workspace::save_config(&config)?;
    println!("✓ Render mode set to {mode}");
    Ok(())
}

/// `pollen configure timeout <secs>`; `0` removes the timeout.
pub fn set_timeout(secs: u64) -> Result<()> {
    let mut config = pollen_core::workspace::load_config()?;
    config.api.timeout_secs = (secs > 0).then_some(secs);
    pollen_core::workspace::save_config(&config)?;
    match config.api.timeout_secs {
        Some(secs) => println!("✓ Request timeout set to {secs}s"),
        None => println!("✓ Request timeout removed"),
    }
    Ok(())
}
