//! User-level defaults — `~/.labbench/config.yaml`.
//!
//! Optional, never required: a missing or unreadable file yields stock
//! defaults. Resolution order is CLI flag → user config → built-in default.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::orchestrator::Gpu;

/// Defaults a user can pin so they stop repeating flags.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Defaults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpu: Option<Gpu>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_agents: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_rounds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_parallel: Option<u32>,
    /// Where run directories are created. Default: `runs/` under cwd.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runs_dir: Option<PathBuf>,
}

/// Path to `~/.labbench/config.yaml`.
fn user_config_path() -> Option<PathBuf> {
    #[cfg(windows)]
    let home = std::env::var("USERPROFILE").ok();
    #[cfg(not(windows))]
    let home = std::env::var("HOME").ok();

    home.map(|p| PathBuf::from(p).join(".labbench").join("config.yaml"))
}

impl Defaults {
    /// Load user defaults from disk. Never fails — parse problems are logged
    /// and fall back to stock defaults.
    pub fn load() -> Self {
        let Some(path) = user_config_path() else {
            return Self::default();
        };
        Self::load_from(&path)
    }

    fn load_from(path: &std::path::Path) -> Self {
        let Ok(raw) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match serde_yaml::from_str(&raw) {
            Ok(defaults) => defaults,
            Err(e) => {
                tracing::warn!("ignoring malformed {}: {e}", path.display());
                Self::default()
            }
        }
    }
}
