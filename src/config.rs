use crate::embed::{DEFAULT_MOUNT_ID, DEFAULT_PROJECT_ID};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::str::FromStr;

/// How the process was started. Decided once by the entry point; there are
/// no transitions afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Direct browser load during development; the server self-bootstraps
    /// the widget with default configuration and serves it at `/`.
    Standalone,
    /// Loaded as a library surface inside a host page; the host drives the
    /// bootstrap explicitly and no auto-invocation happens.
    Embedded,
}

impl FromStr for RunMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "standalone" => Ok(Self::Standalone),
            "embedded" => Ok(Self::Embedded),
            other => anyhow::bail!("unknown run mode {other:?} (expected standalone or embedded)"),
        }
    }
}

/// Runtime configuration for the chatbox server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub run_mode: RunMode,
    pub default_project_id: i64,
    pub default_token: Option<String>,
    pub mount_id: String,
    pub enable_cors: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr: SocketAddr = std::env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .context("failed to parse BIND_ADDR")?;

        let run_mode = match std::env::var("CHATBOX_MODE") {
            Ok(raw) => raw.parse().context("failed to parse CHATBOX_MODE")?,
            Err(_) => RunMode::Standalone,
        };

        let default_project_id = std::env::var("CHATBOX_PROJECT_ID")
            .ok()
            .map(|v| v.parse::<i64>().context("failed to parse CHATBOX_PROJECT_ID"))
            .transpose()?
            .unwrap_or(DEFAULT_PROJECT_ID);

        let default_token = std::env::var("CHATBOX_TOKEN").ok();

        let mount_id =
            std::env::var("CHATBOX_MOUNT_ID").unwrap_or_else(|_| DEFAULT_MOUNT_ID.to_string());

        let enable_cors = std::env::var("ENABLE_CORS")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Ok(Self {
            bind_addr,
            run_mode,
            default_project_id,
            default_token,
            mount_id,
            enable_cors,
        })
    }
}
