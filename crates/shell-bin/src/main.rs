//! Sohwagi shell core: session hand-off between the native host and the web app.

mod app;
mod host;

use std::path::PathBuf;

use app::EndSession;
use clap::{Parser, Subcommand};
use shell_config_and_utils::{init_logging, Config, Paths};

/// Sohwagi shell command-line interface.
#[derive(Parser)]
#[command(name = "sohwagi-shell")]
#[command(about = "Session core for the Sohwagi shell")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error). Defaults to the config value
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Base directory for runtime files (config, session, logs). Defaults to ~/.sohwagi
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,

    /// Backend base URL, overriding config and environment
    #[arg(long, global = true)]
    api_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve a native host over stdin/stdout
    Run {
        /// Keep the session in memory only
        #[arg(long)]
        ephemeral: bool,
    },
    /// Show the stored session
    Status {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// End the backend session and clear local state
    Logout,
    /// Delete the account on the backend and clear local state
    DeleteAccount,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let paths = match cli.base_dir {
        Some(base) => Paths::with_base_dir(base),
        None => Paths::new()?,
    };
    let mut config = Config::load(&paths)?;
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
        config.validate()?;
    }

    let log_level = cli.log_level.unwrap_or_else(|| config.log_level.clone());
    init_logging("shell", &log_level, &paths);

    match cli.command {
        Some(Commands::Run { ephemeral }) => {
            app::run_shell(config, paths, ephemeral).await?;
        }
        None => {
            app::run_shell(config, paths, false).await?;
        }
        Some(Commands::Status { json }) => {
            app::show_status(&paths, json)?;
        }
        Some(Commands::Logout) => {
            app::end_session(&config, &paths, EndSession::Logout).await?;
        }
        Some(Commands::DeleteAccount) => {
            app::end_session(&config, &paths, EndSession::DeleteAccount).await?;
        }
    }

    Ok(())
}
