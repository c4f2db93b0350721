//! CLI command handlers.

pub mod ask;
pub mod chat;
pub mod config;
pub mod ping;
pub mod repl;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context as _, Result};
use fuse_chat::Conversation;
use fuse_config::{ChatSettings, ClientConfig, TimeoutConfig};
use fuse_mcp::RequestTimeouts;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Path of the client config file, if a config directory is known.
    pub config_path: Option<PathBuf>,
    /// Client config as loaded from disk.
    pub config: ClientConfig,
    /// Settings after applying CLI overrides to the config file.
    pub settings: ChatSettings,
    /// Output as JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
}

impl Context {
    /// Load the client config and apply the `--server` override.
    pub fn load(
        config_dir: Option<PathBuf>,
        server: Option<String>,
        json_output: bool,
        verbose: bool,
    ) -> Result<Self> {
        let config_path = fuse_config::client_config_path(config_dir.as_deref());
        let config = fuse_config::load_client_config_from(config_path.as_deref())
            .context("failed to load client config")?;

        let mut settings = config.to_settings();
        if let Some(url) = server
            && !url.trim().is_empty()
        {
            settings = settings.with_server_url(url);
        }

        Ok(Self {
            config_path,
            config,
            settings,
            json_output,
            verbose,
        })
    }

    /// Request timeouts from the config file.
    pub fn timeouts(&self) -> RequestTimeouts {
        request_timeouts(&self.config.timeouts)
    }

    /// A fresh conversation over HTTP using the configured timeouts.
    pub fn conversation(&self) -> Result<Conversation> {
        let conversation = Conversation::http().context("failed to build HTTP client")?;
        Ok(conversation.with_timeouts(self.timeouts()))
    }
}

fn request_timeouts(config: &TimeoutConfig) -> RequestTimeouts {
    RequestTimeouts {
        tool_call: Duration::from_secs(config.tool_call_secs),
        probe: Duration::from_secs(config.probe_secs),
    }
}
