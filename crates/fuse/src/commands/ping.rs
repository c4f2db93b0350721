//! Ping command - test the connection to the MCP server.

use anyhow::Result;
use clap::Args;
use console::Style;

use super::Context;

/// Arguments for the ping command.
#[derive(Args, Debug)]
pub struct PingArgs {}

/// Run the ping command.
pub async fn run(_args: PingArgs, ctx: &Context) -> Result<()> {
    let conversation = ctx.conversation()?;
    let check = conversation.test_connection(&ctx.settings).await?;

    if ctx.json_output {
        let output = serde_json::json!({
            "server_url": ctx.settings.server_url,
            "connected": check.connected,
            "message": check.message,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if check.connected {
        let green = Style::new().green();
        println!("{} {}", green.apply_to("✓"), check.message);
    } else {
        let red = Style::new().red();
        println!("{} {}", red.apply_to("✗"), check.message);
    }

    if ctx.verbose && !ctx.json_output {
        let dim = Style::new().dim();
        for entry in conversation.recent_debug_logs() {
            println!("{}", dim.apply_to(entry.to_string()));
        }
    }

    if !check.connected {
        anyhow::bail!("connection test failed");
    }
    Ok(())
}
