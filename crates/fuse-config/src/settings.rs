//! Per-turn chat settings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// LLM provider the server should route a chat through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Openai,
    Anthropic,
}

impl Provider {
    pub const ALL: [Provider; 2] = [Provider::Openai, Provider::Anthropic];

    /// Wire name sent in tool arguments.
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Openai => "openai",
            Provider::Anthropic => "anthropic",
        }
    }

    /// Model used when none is configured.
    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::Openai => "gpt-3.5-turbo",
            Provider::Anthropic => "claude-3-sonnet-20240229",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Provider::Openai),
            "anthropic" => Ok(Provider::Anthropic),
            other => Err(ConfigError::UnknownProvider(other.to_string())),
        }
    }
}

/// Inputs a conversation reads at the start of every turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSettings {
    /// Tool server endpoint. Must be non-empty before sending.
    pub server_url: String,
    pub provider: Provider,
    pub model: String,
    /// Use the server-side memory tool, keyed by session id.
    pub use_memory: bool,
}

impl Default for ChatSettings {
    fn default() -> Self {
        let provider = Provider::default();
        Self {
            server_url: String::new(),
            provider,
            model: provider.default_model().to_string(),
            use_memory: true,
        }
    }
}

impl ChatSettings {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self::default().with_server_url(server_url)
    }

    pub fn with_server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = url.into();
        self
    }

    /// Switch provider, resetting the model to that provider's default.
    pub fn with_provider(mut self, provider: Provider) -> Self {
        self.provider = provider;
        self.model = provider.default_model().to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_memory(mut self, use_memory: bool) -> Self {
        self.use_memory = use_memory;
        self
    }

    /// Whether a server URL has been entered.
    pub fn has_server_url(&self) -> bool {
        !self.server_url.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_models() {
        assert_eq!(Provider::Openai.default_model(), "gpt-3.5-turbo");
        assert_eq!(Provider::Anthropic.default_model(), "claude-3-sonnet-20240229");
    }

    #[test]
    fn test_provider_parse() {
        assert_eq!("openai".parse::<Provider>().unwrap(), Provider::Openai);
        assert_eq!(" Anthropic ".parse::<Provider>().unwrap(), Provider::Anthropic);
        assert!(matches!(
            "gemini".parse::<Provider>(),
            Err(ConfigError::UnknownProvider(p)) if p == "gemini"
        ));
    }

    #[test]
    fn test_provider_display_roundtrip() {
        for provider in Provider::ALL {
            assert_eq!(provider.to_string().parse::<Provider>().unwrap(), provider);
        }
    }

    #[test]
    fn test_settings_defaults() {
        let settings = ChatSettings::default();
        assert!(!settings.has_server_url());
        assert_eq!(settings.provider, Provider::Openai);
        assert_eq!(settings.model, "gpt-3.5-turbo");
        assert!(settings.use_memory);
    }

    #[test]
    fn test_with_provider_resets_model() {
        let settings = ChatSettings::new("http://x")
            .with_model("gpt-4")
            .with_provider(Provider::Anthropic);
        assert_eq!(settings.model, "claude-3-sonnet-20240229");

        let settings = settings.with_model("claude-3-opus");
        assert_eq!(settings.model, "claude-3-opus");
    }

    #[test]
    fn test_whitespace_url_is_missing() {
        assert!(!ChatSettings::new("   ").has_server_url());
        assert!(ChatSettings::new("http://localhost:3000").has_server_url());
    }
}
