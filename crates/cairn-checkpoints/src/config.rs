//! Checkpoint gate configuration.
//!
//! Provides [`CheckpointConfig`]: which network's table is active and whether
//! checkpoints are enforced at all. Values come from an optional TOML file,
//! overridden by `CAIRN_*` environment variables:
//!
//! ```toml
//! network = "testnet"
//! checkpoints = false
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use cairn_core::constants::{DEFAULT_CHECKPOINTS_ENABLED, ENV_PREFIX, NetworkType};
use cairn_core::error::ConfigError;

/// Configuration for the checkpoint gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckpointConfig {
    /// Network whose checkpoint table is active.
    pub network: NetworkType,
    /// Enforce checkpoints. Disabling is an escape hatch for private
    /// networks and operators who know what they are doing.
    pub checkpoints: bool,
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            network: NetworkType::default(),
            checkpoints: DEFAULT_CHECKPOINTS_ENABLED,
        }
    }
}

impl CheckpointConfig {
    /// Load configuration from `path` (required if given) and the environment.
    ///
    /// Without a path, the default file is read when it exists.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, env_source())
    }

    /// Like [`load`](Self::load) with an explicit environment source.
    fn load_with_env(path: Option<&Path>, env: config::Environment) -> Result<Self, ConfigError> {
        let file = match path {
            Some(p) => config::File::from(p.to_path_buf()).required(true),
            None => config::File::from(default_config_path()).required(false),
        };

        let cfg: Self = config::Config::builder()
            .add_source(file.format(config::FileFormat::Toml))
            .add_source(env)
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| ConfigError::Load(e.to_string()))?;

        debug!(network = %cfg.network, checkpoints = cfg.checkpoints, "loaded checkpoint config");
        Ok(cfg)
    }
}

/// `CAIRN_*` variables, with `true`/`false` parsed as booleans.
fn env_source() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX).try_parsing(true)
}

/// `<config dir>/cairn/cairn.toml`, falling back to the working directory.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cairn")
        .join("cairn.toml")
}
