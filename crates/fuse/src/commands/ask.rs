//! Ask command - one message, one reply.

use anyhow::Result;
use clap::Args;
use console::Style;
use fuse_chat::TurnOutcome;
use serde::Serialize;

use super::Context;
use super::chat::TurnArgs;

/// Arguments for the ask command.
#[derive(Args, Debug)]
pub struct AskArgs {
    /// The message to send
    #[arg(required = true)]
    pub message: String,

    #[command(flatten)]
    pub turn: TurnArgs,
}

#[derive(Serialize)]
struct AskOutput<'a> {
    session_id: &'a str,
    content: &'a str,
    is_error: bool,
}

/// Run the ask command.
pub async fn run(args: AskArgs, ctx: &Context) -> Result<()> {
    let settings = args.turn.apply(ctx.settings.clone());
    let conversation = ctx.conversation()?;
    let dim = Style::new().dim();

    if ctx.verbose && !ctx.json_output {
        eprintln!("{}", dim.apply_to(format!("Sending to: {}", settings.server_url)));
        eprintln!(
            "{}",
            dim.apply_to(format!("Session: {}", conversation.session_id()))
        );
    }

    let outcome = conversation.submit(&args.message, &settings).await?;

    if ctx.json_output {
        let session_id = conversation.session_id();
        let output = AskOutput {
            session_id: &session_id,
            content: outcome.content(),
            is_error: !outcome.is_success(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    }

    match outcome {
        TurnOutcome::Replied(text) => {
            if !ctx.json_output {
                println!("{}", text);
            }
            Ok(())
        }
        TurnOutcome::Failed(message) => {
            if !ctx.json_output {
                let red = Style::new().red();
                eprintln!("{}", red.apply_to(&message));
            }
            anyhow::bail!("message could not be delivered")
        }
    }
}
