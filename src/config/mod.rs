//! Sidebar configuration
//!
//! Precedence (lowest to highest): built-in defaults, optional TOML file,
//! `CANOPY__*` environment variables (`__` separates nested keys, e.g.
//! `CANOPY__TREE__RESOLVE_COOLDOWN_MS=2000`).

mod loader;

pub use loader::ConfigLoader;

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Tree walk and cache tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Upper bound on parent hops while reconstructing an ancestor chain
    #[serde(default = "default_max_ancestor_depth")]
    pub max_ancestor_depth: usize,

    /// How long a resolved target suppresses re-resolution (milliseconds)
    #[serde(default = "default_resolve_cooldown_ms")]
    pub resolve_cooldown_ms: u64,
}

fn default_max_ancestor_depth() -> usize {
    64
}

fn default_resolve_cooldown_ms() -> u64 {
    5000
}

impl TreeConfig {
    pub fn resolve_cooldown(&self) -> Duration {
        Duration::from_millis(self.resolve_cooldown_ms)
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_ancestor_depth: default_max_ancestor_depth(),
            resolve_cooldown_ms: default_resolve_cooldown_ms(),
        }
    }
}

/// Action menu geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuConfig {
    #[serde(default = "default_margin")]
    pub margin: f32,
    #[serde(default = "default_menu_width")]
    pub default_width: f32,
    #[serde(default = "default_menu_height")]
    pub default_height: f32,
}

fn default_margin() -> f32 {
    8.0
}

fn default_menu_width() -> f32 {
    240.0
}

fn default_menu_height() -> f32 {
    200.0
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            margin: default_margin(),
            default_width: default_menu_width(),
            default_height: default_menu_height(),
        }
    }
}

/// Offline snapshot location
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// sled directory; None means the platform data directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Page service endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SidebarConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub tree: TreeConfig,
    #[serde(default)]
    pub menu: MenuConfig,
    #[serde(default)]
    pub snapshot: SnapshotConfig,
    #[serde(default)]
    pub source: SourceConfig,
}
