mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info};

use livehost_core::{bootstrap::load_config, logging, models::IngressInput};

#[derive(Parser, Debug)]
#[command(name = "livehost")]
#[command(about = "Provision media ingest endpoints for live hosts", long_about = None)]
struct Args {
    /// Config file (YAML or TOML)
    #[arg(long, global = true, env = "LIVEHOST_CONFIG_PATH")]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Delete every room and ingress the provider holds for a host
    Reset {
        #[arg(long)]
        host_id: String,
    },
    /// Replace a host's ingress and store the new credentials
    Create {
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        username: String,
        #[arg(long, value_enum, default_value_t = Mode::Rtmp)]
        mode: Mode,
    },
    /// Print a host's stored stream record
    ///
    /// The caller must own the record.
    Keys {
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        username: String,
        /// Record to read, defaults to the caller's own
        #[arg(long)]
        host_id: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Rtmp,
    Whip,
}

impl From<Mode> for IngressInput {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Rtmp => Self::RtmpInput,
            Mode::Whip => Self::WhipInput,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;
    let _log_guard = logging::init_logging(&config.logging)?;

    info!(command = ?args.command, "Starting livehost");

    let output = commands::run(&config, args.command).await.map_err(|e| {
        error!(error = %e, "Command failed");
        e
    })?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
