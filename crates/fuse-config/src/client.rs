//! Client configuration file.
//!
//! ```yaml
//! server-url: https://abc123.execute-api.us-east-1.amazonaws.com/prod
//! provider: anthropic
//! model: claude-3-sonnet-20240229
//! use-memory: true
//! timeouts:
//!   tool-call-secs: 30
//!   probe-secs: 10
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::settings::{ChatSettings, Provider};
use crate::{ConfigError, Result};

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "FUSE_CONFIG_DIR";

/// Application name for platform config directory resolution.
const APP_NAME: &str = "fuse";

/// Default config filename.
const CLIENT_CONFIG_FILE: &str = "client.yaml";

/// Keys accepted by [`ClientConfig::set_value`].
pub const CONFIG_KEYS: &[&str] = &[
    "server-url",
    "provider",
    "model",
    "use-memory",
    "timeouts.tool-call-secs",
    "timeouts.probe-secs",
];

// ─────────────────────────────────────────────────────────────────────────────
// Client Config
// ─────────────────────────────────────────────────────────────────────────────

/// Root client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClientConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_url: Option<String>,

    #[serde(default)]
    pub provider: Provider,

    /// Model override; the provider default when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(default = "default_use_memory")]
    pub use_memory: bool,

    #[serde(default)]
    pub timeouts: TimeoutConfig,
}

fn default_use_memory() -> bool {
    true
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: None,
            provider: Provider::default(),
            model: None,
            use_memory: default_use_memory(),
            timeouts: TimeoutConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Parse from a YAML string.
    pub fn from_yaml(yaml_str: &str) -> Result<Self> {
        serde_yaml::from_str(yaml_str).map_err(|e| ConfigError::ParseYaml(e.to_string()))
    }

    /// Serialize to a YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::ParseYaml(e.to_string()))
    }

    /// The configured model, or the provider's default.
    pub fn effective_model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }

    /// Chat settings described by this file.
    pub fn to_settings(&self) -> ChatSettings {
        ChatSettings {
            server_url: self.server_url.clone().unwrap_or_default(),
            provider: self.provider,
            model: self.effective_model().to_string(),
            use_memory: self.use_memory,
        }
    }

    /// Set a single key from its string form. An empty value unsets
    /// `server-url` and `model`.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "server-url" => self.server_url = non_empty(value),
            "provider" => self.provider = value.parse()?,
            "model" => self.model = non_empty(value),
            "use-memory" => self.use_memory = parse_bool(key, value)?,
            "timeouts.tool-call-secs" => self.timeouts.tool_call_secs = parse_secs(key, value)?,
            "timeouts.probe-secs" => self.timeouts.probe_secs = parse_secs(key, value)?,
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }
}

/// Request timeouts, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TimeoutConfig {
    #[serde(default = "default_tool_call_secs")]
    pub tool_call_secs: u64,
    #[serde(default = "default_probe_secs")]
    pub probe_secs: u64,
}

fn default_tool_call_secs() -> u64 {
    30
}

fn default_probe_secs() -> u64 {
    10
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            tool_call_secs: default_tool_call_secs(),
            probe_secs: default_probe_secs(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Loading / Saving
// ─────────────────────────────────────────────────────────────────────────────

/// Config directory: `$FUSE_CONFIG_DIR`, else `<platform config dir>/fuse`.
pub fn config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV)
        && !dir.is_empty()
    {
        return Some(PathBuf::from(dir));
    }
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

/// Path of the client config file inside `dir`, or the default directory.
pub fn client_config_path(dir: Option<&Path>) -> Option<PathBuf> {
    match dir {
        Some(dir) => Some(dir.join(CLIENT_CONFIG_FILE)),
        None => config_dir().map(|d| d.join(CLIENT_CONFIG_FILE)),
    }
}

/// Load client config from a specific path.
///
/// Returns a default config if there is no path or the file doesn't exist.
pub fn load_client_config_from(path: Option<&Path>) -> Result<ClientConfig> {
    let Some(path) = path else {
        return Ok(ClientConfig::default());
    };

    if !path.exists() {
        tracing::debug!(path = %path.display(), "no client config, using defaults");
        return Ok(ClientConfig::default());
    }

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.display().to_string(),
        source: e,
    })?;

    tracing::debug!(path = %path.display(), "loaded client config");
    ClientConfig::from_yaml(&contents)
}

/// Save client config to a specific path, creating parent directories.
pub fn save_client_config_to(config: &ClientConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteFile {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    let contents = config.to_yaml()?;
    std::fs::write(path, contents).map_err(|e| ConfigError::WriteFile {
        path: path.display().to_string(),
        source: e,
    })?;

    tracing::info!(path = %path.display(), "saved client config");
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: "expected true/false".to_string(),
        }),
    }
}

fn parse_secs(key: &str, value: &str) -> Result<u64> {
    match value.parse::<u64>() {
        Ok(0) => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: "must be at least 1".to_string(),
        }),
        Ok(secs) => Ok(secs),
        Err(e) => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: e.to_string(),
        }),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config() {
        let config = ClientConfig::from_yaml("{}").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert!(config.use_memory);
        assert_eq!(config.timeouts.tool_call_secs, 30);
        assert_eq!(config.timeouts.probe_secs, 10);
    }

    #[test]
    fn test_parse_full_yaml() {
        let yaml = r#"
server-url: https://api.example.com/prod
provider: anthropic
model: claude-3-haiku
use-memory: false
timeouts:
  tool-call-secs: 60
"#;
        let config = ClientConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.server_url.as_deref(), Some("https://api.example.com/prod"));
        assert_eq!(config.provider, Provider::Anthropic);
        assert_eq!(config.effective_model(), "claude-3-haiku");
        assert!(!config.use_memory);
        assert_eq!(config.timeouts.tool_call_secs, 60);
        assert_eq!(config.timeouts.probe_secs, 10);
    }

    #[test]
    fn test_invalid_yaml() {
        let result = ClientConfig::from_yaml("provider: [nope");
        assert!(matches!(result, Err(ConfigError::ParseYaml(_))));

        let result = ClientConfig::from_yaml("provider: gemini");
        assert!(result.is_err());
    }

    #[test]
    fn test_to_settings_uses_provider_default_model() {
        let config = ClientConfig {
            server_url: Some("http://localhost:3000".to_string()),
            provider: Provider::Anthropic,
            ..Default::default()
        };
        let settings = config.to_settings();
        assert_eq!(settings.server_url, "http://localhost:3000");
        assert_eq!(settings.model, "claude-3-sonnet-20240229");
        assert!(settings.use_memory);
    }

    #[test]
    fn test_set_value() {
        let mut config = ClientConfig::default();
        config.set_value("server-url", " http://x ").unwrap();
        config.set_value("provider", "anthropic").unwrap();
        config.set_value("model", "claude-3-opus").unwrap();
        config.set_value("use-memory", "off").unwrap();
        config.set_value("timeouts.probe-secs", "3").unwrap();

        assert_eq!(config.server_url.as_deref(), Some("http://x"));
        assert_eq!(config.provider, Provider::Anthropic);
        assert_eq!(config.model.as_deref(), Some("claude-3-opus"));
        assert!(!config.use_memory);
        assert_eq!(config.timeouts.probe_secs, 3);

        config.set_value("model", "").unwrap();
        assert!(config.model.is_none());
    }

    #[test]
    fn test_set_value_rejects_bad_input() {
        let mut config = ClientConfig::default();
        assert!(matches!(
            config.set_value("colour", "blue"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            config.set_value("use-memory", "maybe"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            config.set_value("timeouts.tool-call-secs", "0"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            config.set_value("provider", "cohere"),
            Err(ConfigError::UnknownProvider(_))
        ));
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_every_listed_key_is_settable() {
        let samples = ["http://x", "openai", "gpt-4", "true", "5", "5"];
        let mut config = ClientConfig::default();
        for (key, value) in CONFIG_KEYS.iter().zip(samples) {
            config.set_value(key, value).unwrap();
        }
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.yaml");
        let config = load_client_config_from(Some(&path)).unwrap();
        assert_eq!(config, ClientConfig::default());

        let config = load_client_config_from(None).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = client_config_path(Some(&dir.path().join("nested"))).unwrap();

        let mut config = ClientConfig::default();
        config.set_value("server-url", "http://localhost:9000/mcp").unwrap();
        config.set_value("provider", "anthropic").unwrap();

        save_client_config_to(&config, &path).unwrap();
        let loaded = load_client_config_from(Some(&path)).unwrap();

        assert_eq!(loaded, config);
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("server-url: http://localhost:9000/mcp"));
        assert!(!text.contains("model:"));
    }
}
