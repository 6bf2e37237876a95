//! Display configuration
//!
//! Host-tunable display parameters with generic YAML load/save helpers.
//! Loading is infallible: a missing or unparseable file falls back to
//! defaults with a warning, so a bad config can never keep the graph from
//! coming up.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunable display parameters for the waveform graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Height of the ruler strip in logical units
    pub ruler_height: f32,
    /// Whole-second tick height
    pub major_tick_height: f32,
    /// Tenth-second tick height
    pub minor_tick_height: f32,
    /// Minor ticks render only when their per-second density over the
    /// visible duration clears this threshold
    pub minor_tick_legibility: f64,
    /// Zoom applied when a track is first shown
    pub initial_zoom: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            ruler_height: 30.0,
            major_tick_height: 30.0,
            minor_tick_height: 15.0,
            minor_tick_legibility: 3.0,
            initial_zoom: 10.0,
        }
    }
}

/// Load configuration from a YAML file
///
/// If the file doesn't exist, returns default config. If the file exists but
/// is invalid, logs a warning and returns default config.
pub fn load_config<T>(path: &Path) -> T
where
    T: DeserializeOwned + Default,
{
    if !path.exists() {
        log::info!("load_config: {:?} doesn't exist, using defaults", path);
        return T::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match serde_yaml::from_str::<T>(&contents) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("load_config: Failed to parse {:?}: {}, using defaults", path, e);
                T::default()
            }
        },
        Err(e) => {
            log::warn!("load_config: Failed to read {:?}: {}, using defaults", path, e);
            T::default()
        }
    }
}

/// Save configuration to a YAML file, creating parent directories as needed
pub fn save_config<T>(config: &T, path: &Path) -> Result<()>
where
    T: Serialize,
{
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
    }

    let yaml = serde_yaml::to_string(config).context("Failed to serialize config to YAML")?;
    std::fs::write(path, yaml)
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    log::info!("save_config: saved {:?}", path);
    Ok(())
}
