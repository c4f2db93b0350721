//! Chat command - interactive REPL mode.

use anyhow::Result;
use clap::Args;
use fuse_config::{ChatSettings, Provider};

use super::Context;
use super::repl::Repl;

/// Per-run overrides for the chat settings.
#[derive(Args, Debug, Clone, Default)]
pub struct TurnArgs {
    /// LLM provider: openai or anthropic
    #[arg(long)]
    pub provider: Option<Provider>,

    /// Model name (default: the provider's default model)
    #[arg(long)]
    pub model: Option<String>,

    /// Use the stateless chat tool instead of conversation memory
    #[arg(long)]
    pub no_memory: bool,
}

impl TurnArgs {
    /// Apply these overrides on top of `settings`.
    pub fn apply(&self, mut settings: ChatSettings) -> ChatSettings {
        if let Some(provider) = self.provider {
            settings = settings.with_provider(provider);
        }
        if let Some(ref model) = self.model {
            settings = settings.with_model(model.clone());
        }
        if self.no_memory {
            settings = settings.with_memory(false);
        }
        settings
    }
}

/// Arguments for the chat command.
#[derive(Args, Debug)]
pub struct ChatArgs {
    #[command(flatten)]
    pub turn: TurnArgs,
}

/// Run the chat command (REPL).
pub async fn run(args: ChatArgs, ctx: &Context) -> Result<()> {
    let conversation = ctx.conversation()?;
    let settings = args.turn.apply(ctx.settings.clone());

    let mut repl = Repl::new(conversation, settings, ctx.verbose)?;
    repl.run().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_override_resets_model() {
        let args = TurnArgs {
            provider: Some(Provider::Anthropic),
            ..Default::default()
        };
        let settings = args.apply(ChatSettings::new("http://x").with_model("gpt-4"));
        assert_eq!(settings.provider, Provider::Anthropic);
        assert_eq!(settings.model, "claude-3-sonnet-20240229");
    }

    #[test]
    fn test_model_and_memory_overrides() {
        let args = TurnArgs {
            provider: Some(Provider::Openai),
            model: Some("gpt-4o".to_string()),
            no_memory: true,
        };
        let settings = args.apply(ChatSettings::new("http://x"));
        assert_eq!(settings.model, "gpt-4o");
        assert!(!settings.use_memory);
    }

    #[test]
    fn test_no_overrides_keeps_settings() {
        let base = ChatSettings::new("http://x").with_model("custom");
        assert_eq!(TurnArgs::default().apply(base.clone()), base);
    }
}
