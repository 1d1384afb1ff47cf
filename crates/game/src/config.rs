//! Game configuration (window, input, assets). Loaded from config.ron at startup.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Persistent settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Window width in logical pixels.
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    /// Window height in logical pixels.
    #[serde(default = "default_window_height")]
    pub window_height: u32,
    /// Mouse sensitivity multiplier (1.0 = default).
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f32,
    /// Directory holding the six skybox face images.
    #[serde(default = "default_sky_dir")]
    pub sky_dir: PathBuf,
    /// Restore the free camera and clear color from the previous session.
    #[serde(default = "default_true")]
    pub restore_session: bool,
}

fn default_window_width() -> u32 {
    1280
}
fn default_window_height() -> u32 {
    720
}
fn default_sensitivity() -> f32 {
    1.0
}
fn default_sky_dir() -> PathBuf {
    PathBuf::from("assets/sky")
}
fn default_true() -> bool {
    true
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            sensitivity: default_sensitivity(),
            sky_dir: default_sky_dir(),
            restore_session: default_true(),
        }
    }
}

impl GameConfig {
    /// Load config from `config.ron`. If the file is missing or invalid,
    /// returns the default config.
    pub fn load() -> Self {
        let path = config_path();
        if let Ok(data) = std::fs::read_to_string(&path) {
            match ron::from_str(&data) {
                Ok(c) => return c,
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            }
        }
        Self::default()
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("config.ron")
}
