mod commands;
mod factory;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::warn;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{reload, EnvFilter, Registry};

use pollen_common::error::PollenError;
use pollen_utils::output::OutputFormat;

use crate::factory::Context;

#[derive(Parser)]
#[command(
    name = "pollen",
    about = "Pollen & spore counts from the command line.\nTalks to the pollen backend; every command can output JSON for scripts.",
    version,
    propagate_version = true
)]
struct Cli {
    #[arg(long, short = 'o', global = true, default_value = "table")]
    output: CliOutputFormat,

    /// Backend base URL (overrides POLLEN_API_URL and the config file).
    #[arg(long, global = true)]
    url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat { Table, Json, JsonPretty }

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> OutputFormat {
        match f {
            CliOutputFormat::Table => OutputFormat::Table,
            CliOutputFormat::Json => OutputFormat::Json,
            CliOutputFormat::JsonPretty => OutputFormat::JsonPretty,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  TOP-LEVEL
// ═══════════════════════════════════════════════════════════════════════

#[derive(Subcommand)]
enum Commands {
    // ── DATA ────────────────────────────────────────────────────

    /// List every genus the backend knows.
    Genera,

    /// Last year of counts for one or more genera.
    Recent {
        #[arg(required = true)]
        genera: Vec<String>,
    },

    /// Last few days for every genus, unprocessed.
    RecentRaw,

    /// Counts for a genus between two dates (YYYY-MM-DD).
    Between { genus: String, from: String, to: String },

    /// Historical heatmap for a genus, missing cells restored.
    Heatmap { genus: String },

    /// Download the rendered line plot for a genus.
    Lineplot {
        genus: String,
        /// Output file (default: ~/.pollen/plots/<genus>.png).
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// UI languages the front-end ships.
    Languages,

    // ── AUTH ────────────────────────────────────────────────────

    /// Log in and store the session token in the OS keyring.
    Login { username: String },

    /// Forget the stored session token.
    Logout,

    /// Send an authorized upload request for a .csv file.
    Upload { file: PathBuf },

    // ── FRONT-END ───────────────────────────────────────────────

    /// Print the front-end route table.
    Routes {
        /// spa, ssr, pwa or electron (default: MODE or config).
        #[arg(long)]
        mode: Option<String>,
    },

    /// Show or change configuration.
    Configure {
        #[command(subcommand)]
        action: ConfigureAction,
    },
}

#[derive(Subcommand)]
enum ConfigureAction {
    /// Show the effective configuration.
    Show,
    /// Set the backend base URL.
    Url { url: String },
    /// Toggle verbose logging.
    Verbose { enabled: bool },
    /// Set the default render mode.
    Mode { mode: String },
    /// Set a per-request timeout in seconds (0 = none).
    Timeout { secs: u64 },
}

// ═══════════════════════════════════════════════════════════════════════
//  ENTRYPOINT
// ═══════════════════════════════════════════════════════════════════════

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let fmt: OutputFormat = cli.output.into();

    if let Err(err) = run(cli, fmt).await {
        std::process::exit(report(&err, fmt));
    }
}

async fn run(cli: Cli, fmt: OutputFormat) -> Result<()> {
    let filter = init_tracing();
    pollen_core::init_workspace()?;
    let config = pollen_core::workspace::load_config()?;
    if wants_debug(config.system.verbose, std::env::var_os(EnvFilter::DEFAULT_ENV).is_some()) {
        if let Err(e) = filter.reload(EnvFilter::new("debug")) {
            warn!("could not enable verbose logging: {e}");
        }
    }

    let ctx = Context::new(config, cli.url);

    match cli.command {
        // ── DATA ────────────────────────────────────────────────
        Commands::Genera => commands::data::genera(&ctx.client()?, fmt).await,
        Commands::Recent { genera } => commands::data::recent(&ctx.client()?, &genera, fmt).await,
        Commands::RecentRaw => commands::data::recent_raw(&ctx.client()?, fmt).await,
        Commands::Between { genus, from, to } => {
            commands::data::between(&ctx.client()?, &genus, &from, &to, fmt).await
        }
        Commands::Heatmap { genus } => commands::data::heatmap(&ctx.client()?, &genus, fmt).await,
        Commands::Lineplot { genus, out } => {
            commands::data::lineplot(&ctx.client()?, &genus, out, fmt).await
        }
        Commands::Languages => commands::data::languages(&ctx.client()?, fmt),

        // ── AUTH ────────────────────────────────────────────────
        Commands::Login { username } => commands::auth::login(&ctx, &username, fmt).await,
        Commands::Logout => commands::auth::logout(&ctx, fmt),
        Commands::Upload { file } => commands::auth::upload(&ctx, &file, fmt).await,

        // ── FRONT-END ───────────────────────────────────────────
        Commands::Routes { mode } => commands::routes::run(ctx.mode(mode.as_deref())?, fmt),

        Commands::Configure { action } => match action {
            ConfigureAction::Show => commands::configure::show(&ctx, fmt),
            ConfigureAction::Url { url } => commands::configure::set_url(&url),
            ConfigureAction::Verbose { enabled } => commands::configure::set_verbose(enabled),
            ConfigureAction::Mode { mode } => commands::configure::set_mode(&mode),
            ConfigureAction::Timeout { secs } => commands::configure::set_timeout(secs),
        },
    }
}

/// Install the subscriber before anything logs. The filter starts from
/// RUST_LOG and can be swapped once the config is known. Logs go to
/// stderr so JSON on stdout stays clean.
fn init_tracing() -> reload::Handle<EnvFilter, Registry> {
    let (filter, handle) = reload::Layer::new(EnvFilter::from_default_env());
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
    handle
}

/// `verbose` only applies when RUST_LOG is unset.
fn wants_debug(verbose: bool, rust_log_set: bool) -> bool {
    verbose && !rust_log_set
}

/// Print `err` in the requested format and return the exit code.
fn report(err: &anyhow::Error, fmt: OutputFormat) -> i32 {
    let fallback;
    let error = match err.downcast_ref::<PollenError>() {
        Some(e) => e,
        None => {
            fallback = PollenError::Other(format!("{err:#}"));
            &fallback
        }
    };

    match fmt {
        OutputFormat::Table => {
            eprintln!("Error: {error}");
            for hint in error.detail().hints {
                eprintln!("  hint: {hint}");
            }
        }
        OutputFormat::Json => println!("{}", error.to_json()),
        OutputFormat::JsonPretty => {
            let json = error.to_json();
            println!("{}", serde_json::to_string_pretty(&json).unwrap_or_else(|_| json.to_string()));
        }
    }

    error.exit_code()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::helpers::parse_date;
    use crate::factory::parse_mode;

    #[test]
    fn test_bad_date_exits_with_user_error() {
        let err = anyhow::Error::from(parse_date("2023-02-30").unwrap_err());
        assert_eq!(report(&err, OutputFormat::Json), 1);
    }

    #[test]
    fn test_bad_mode_exits_with_user_error() {
        let err = anyhow::Error::from(parse_mode("desktop").unwrap_err());
        assert_eq!(report(&err, OutputFormat::Table), 1);
    }

    #[test]
    fn test_untyped_error_is_system_error() {
        let err = anyhow::anyhow!("something else");
        assert_eq!(report(&err, OutputFormat::JsonPretty), 3);
    }

    #[test]
    fn test_wants_debug() {
        assert!(wants_debug(true, false));
        assert!(!wants_debug(true, true));
        assert!(!wants_debug(false, false));
    }
}
