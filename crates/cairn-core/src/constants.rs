//! Protocol constants shared by the checkpoint gate and progress estimator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Network type: Mainnet or Testnet.
///
/// Selects which compiled-in checkpoint table and metadata are active. The
/// value is always handed in by the caller; nothing in this workspace reads
/// it from global state.
///
/// # Examples
///
/// ```
/// use cairn_core::constants::NetworkType;
/// let net = NetworkType::default();
/// assert_eq!(net, NetworkType::Mainnet);
/// assert_eq!(net.name(), "mainnet");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    /// Production network.
    #[default]
    Mainnet,
    /// Public test network.
    Testnet,
}

impl NetworkType {
    /// Lowercase name used in config files and log lines.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
        }
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How many times slower a transaction after the last checkpoint is expected
/// to verify compared to one at or before it.
///
/// This is a compromise: reindexing from a fast disk with a slow CPU can be up
/// to 20x, while downloading over a slow link on a fast multicore machine is
/// barely above 1x.
pub const SIGCHECK_VERIFICATION_FACTOR: f64 = 5.0;

pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Checkpoint enforcement is on unless explicitly disabled.
pub const DEFAULT_CHECKPOINTS_ENABLED: bool = true;

/// Prefix for environment variables that override config file values.
pub const ENV_PREFIX: &str = "CAIRN";
