//! Configuration error types.

/// Result type alias for config operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur while loading, saving or editing configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read a config file.
    #[error("failed to read config file '{path}': {source}")]
    ReadFile {
        path: String,
        source: std::io::Error,
    },

    /// Failed to write a config file.
    #[error("failed to write config file '{path}': {source}")]
    WriteFile {
        path: String,
        source: std::io::Error,
    },

    /// Failed to parse or serialize YAML.
    #[error("failed to parse YAML config: {0}")]
    ParseYaml(String),

    /// Unknown provider name.
    #[error("unknown provider '{0}' (expected 'openai' or 'anthropic')")]
    UnknownProvider(String),

    /// Unknown key passed to `config set`.
    #[error("unknown config key '{0}'")]
    UnknownKey(String),

    /// A value that does not parse for its key.
    #[error("invalid value '{value}' for '{key}': {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    /// No usable config directory on this platform.
    #[error("could not determine config directory")]
    NoConfigDir,
}
