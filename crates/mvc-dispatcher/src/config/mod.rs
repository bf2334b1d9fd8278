//! Dispatcher configuration loading and validation
//!
//! Configuration is stored in YAML under a top-level `dispatcher:` key:
//!
//! ```yaml
//! dispatcher:
//!   max_forwards: 256
//!   default_controller: index
//!   default_action: index
//! ```

pub mod loader;
pub mod validator;

pub use loader::ConfigLoader;
pub use validator::ConfigValidator;

use serde::{Deserialize, Serialize};

/// Default limit on inner cycles in a single dispatch
pub const DEFAULT_MAX_FORWARDS: u32 = 256;

/// Tunables of a [`Dispatcher`](crate::Dispatcher)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Maximum number of inner cycles before the dispatch is aborted as cyclic
    pub max_forwards: u32,

    /// Controller used when a descriptor leaves it empty
    pub default_controller: String,

    /// Action used when a descriptor leaves it empty
    pub default_action: String,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            max_forwards: DEFAULT_MAX_FORWARDS,
            default_controller: "index".to_string(),
            default_action: "index".to_string(),
        }
    }
}
