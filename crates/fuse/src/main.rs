//! Fuse - terminal chat client for MCP tool servers
//!
//! Main entry point for the Fuse CLI.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{ask, chat, config, ping};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Fuse - terminal chat client for MCP tool servers
#[derive(Parser)]
#[command(name = "fuse")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// MCP server URL (overrides the config file)
    #[arg(long, global = true, env = "FUSE_SERVER_URL")]
    pub server: Option<String>,

    /// Configuration directory (default: ~/.config/fuse)
    #[arg(long, global = true, env = "FUSE_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Enter interactive chat mode (REPL)
    Chat(chat::ChatArgs),

    /// Send a single message and print the reply
    Ask(ask::AskArgs),

    /// Test the connection to the MCP server
    Ping(ping::PingArgs),

    /// Configuration management
    Config(config::ConfigArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Logging
// ─────────────────────────────────────────────────────────────────────────────

/// Directives for the JSON log file.
const FILE_FILTER: &str =
    "fuse=trace,fuse_chat=trace,fuse_mcp=trace,fuse_session=trace,fuse_config=trace,info";

/// Directives for the stderr console.
///
/// A `fuse=` directive also matches every `fuse_*` crate, so each library
/// crate is listed explicitly.
fn console_filter(verbose: bool) -> &'static str {
    if verbose {
        "fuse=debug,fuse_chat=debug,fuse_mcp=debug,fuse_session=debug,fuse_config=debug,info"
    } else {
        "fuse=info,fuse::debug=off,fuse_chat=warn,fuse_mcp=error,fuse_session=warn,fuse_config=info,warn"
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_dir = cli.config_dir.clone().or_else(fuse_config::config_dir);

    // Console (human-readable, stderr) + rotating JSON file
    let log_dir = config_dir
        .as_ref()
        .map(|d| d.join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"));
    let file_appender = tracing_appender::rolling::daily(&log_dir, "fuse.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(tracing_subscriber::EnvFilter::new(console_filter(cli.verbose))),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(tracing_subscriber::EnvFilter::new(FILE_FILTER)),
        )
        .init();

    let ctx = commands::Context::load(config_dir, cli.server, cli.json, cli.verbose)?;

    match cli.command {
        Commands::Chat(args) => chat::run(args, &ctx).await,
        Commands::Ask(args) => ask::run(args, &ctx).await,
        Commands::Ping(args) => ping::run(args, &ctx).await,
        Commands::Config(args) => config::run(args, &ctx).await,
    }
}
