//! Configuration for the Fuse chat client.
//!
//! Two layers:
//! - [`ChatSettings`]: the per-turn inputs the conversation reads (server URL,
//!   provider, model, memory mode)
//! - [`ClientConfig`]: the YAML file those settings are loaded from, plus
//!   request timeouts
//!
//! Resolution order (later overrides earlier):
//! 1. `<config dir>/fuse/client.yaml` (or `$FUSE_CONFIG_DIR/client.yaml`)
//! 2. CLI flags and environment variables (handled by the binary)

pub mod client;
pub mod error;
pub mod settings;

pub use client::{
    CONFIG_KEYS, ClientConfig, TimeoutConfig, client_config_path, config_dir,
    load_client_config_from, save_client_config_to,
};
pub use error::{ConfigError, Result};
pub use settings::{ChatSettings, Provider};
