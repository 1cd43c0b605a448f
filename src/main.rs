mod config;
mod embed;
mod sdk;
mod server;
mod widget;

use crate::config::{AppConfig, RunMode};
use crate::server::AppState;
use clap::Parser;
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "chatbox-gui", about = "Chatbox widget runtime")]
struct Cli {
    /// Override the run mode: `standalone` serves the dev preview,
    /// `embedded` stays passive and lets the host page drive the bootstrap.
    #[arg(long)]
    mode: Option<RunMode>,
    /// Override the listen address.
    #[arg(long)]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let mut config = AppConfig::from_env()?;
    if let Some(mode) = cli.mode {
        config.run_mode = mode;
    }
    if let Some(bind) = cli.bind {
        config.bind_addr = bind;
    }

    match config.run_mode {
        RunMode::Standalone => tracing::info!(
            project_id = config.default_project_id,
            mount_id = %config.mount_id,
            "standalone mode; self-bootstrapping preview at /"
        ),
        RunMode::Embedded => {
            tracing::info!("embedded mode; host pages drive the bootstrap via /embed.js")
        }
    }

    let addr: SocketAddr = config.bind_addr;
    let state = AppState::new(config);
    tracing::info!(%addr, "starting chatbox-gui server");
    server::run(addr, state).await?;
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}
