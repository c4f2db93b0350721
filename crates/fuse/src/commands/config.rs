//! Config command - client configuration management.

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use console::Style;
use fuse_config::ConfigError;

use super::Context;

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the resolved configuration
    Show,

    /// Show configuration file path
    Path,

    /// Set a configuration value
    Set {
        /// Key: server-url, provider, model, use-memory,
        /// timeouts.tool-call-secs, timeouts.probe-secs
        key: String,

        /// New value (empty to unset server-url or model)
        value: String,
    },
}

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => cmd_show(ctx),
        ConfigCommand::Path => cmd_path(ctx),
        ConfigCommand::Set { key, value } => cmd_set(ctx, &key, &value),
    }
}

fn cmd_show(ctx: &Context) -> Result<()> {
    let settings = &ctx.settings;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": ctx.config_path.as_ref().map(|p| p.display().to_string()),
            "server_url": settings.server_url,
            "provider": settings.provider,
            "model": settings.model,
            "use_memory": settings.use_memory,
            "timeouts": ctx.config.timeouts,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let dim = Style::new().dim();
    println!("# Fuse Configuration\n");

    match ctx.config_path {
        Some(ref path) if path.exists() => println!("Config file: {}\n", path.display()),
        Some(ref path) => println!(
            "Config file: {} {}\n",
            path.display(),
            dim.apply_to("(not found, using defaults)")
        ),
        None => println!("No config directory (using defaults)\n"),
    }

    let server = if settings.has_server_url() {
        settings.server_url.as_str()
    } else {
        "(not set)"
    };
    let overridden = ctx.config.server_url.as_deref() != Some(settings.server_url.as_str())
        && settings.has_server_url();

    println!("Server:");
    if overridden {
        println!("  url:      {} {}", server, dim.apply_to("(from --server)"));
    } else {
        println!("  url:      {}", server);
    }
    println!();
    println!("LLM:");
    println!("  provider: {}", settings.provider);
    println!("  model:    {}", settings.model);
    println!(
        "  memory:   {}",
        if settings.use_memory { "on" } else { "off" }
    );
    println!();
    println!("Timeouts:");
    println!("  tool call: {}s", ctx.config.timeouts.tool_call_secs);
    println!("  probe:     {}s", ctx.config.timeouts.probe_secs);

    if ctx.verbose {
        println!("\n---\nRaw config:\n");
        if let Ok(yaml) = ctx.config.to_yaml() {
            println!("{}", yaml);
        }
    }

    Ok(())
}

fn cmd_path(ctx: &Context) -> Result<()> {
    let path = ctx.config_path.as_deref().ok_or(ConfigError::NoConfigDir)?;
    println!("{}", path.display());
    Ok(())
}

fn cmd_set(ctx: &Context, key: &str, value: &str) -> Result<()> {
    let path = ctx.config_path.as_deref().ok_or(ConfigError::NoConfigDir)?;

    let mut config = ctx.config.clone();
    if let Err(e) = config.set_value(key, value) {
        bail!("{} (valid keys: {})", e, fuse_config::CONFIG_KEYS.join(", "));
    }
    fuse_config::save_client_config_to(&config, path)?;

    tracing::info!(key = %key, path = %path.display(), "config value updated");
    println!("✓ Set {} in {}", key, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fuse_config::ClientConfig;

    fn context_without_config_dir() -> Context {
        let config = ClientConfig::default();
        Context {
            config_path: None,
            settings: config.to_settings(),
            config,
            json_output: false,
            verbose: false,
        }
    }

    #[test]
    fn test_path_without_config_dir_fails() {
        let err = cmd_path(&context_without_config_dir()).unwrap_err();
        let config_err = err.downcast_ref::<ConfigError>();
        assert!(matches!(config_err, Some(ConfigError::NoConfigDir)));
    }

    #[test]
    fn test_set_without_config_dir_fails() {
        let err = cmd_set(&context_without_config_dir(), "provider", "anthropic").unwrap_err();
        let config_err = err.downcast_ref::<ConfigError>();
        assert!(matches!(config_err, Some(ConfigError::NoConfigDir)));
        assert_eq!(err.to_string(), "could not determine config directory");
    }
}
