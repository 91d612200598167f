use std::{env, path::PathBuf};

use super::schema::Settings;
use crate::error::Result;
use crate::visualizer::MAX_FPS;

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `DROPDECK__`), then an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("DROPDECK")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Reject values the analyser or ticker cannot work with.
    pub fn validate(&self) -> std::result::Result<(), String> {
        let fft = self.audio.fft_size;
        if !fft.is_power_of_two() || !(32..=32768).contains(&fft) {
            return Err(format!(
                "audio.fft_size must be a power of two in 32..=32768, got {fft}"
            ));
        }
        if !(0.0..=1.0).contains(&self.audio.smoothing_time_constant) {
            return Err("audio.smoothing_time_constant must be within [0, 1]".to_string());
        }
        if self.audio.min_decibels >= self.audio.max_decibels {
            return Err("audio.min_decibels must be lower than audio.max_decibels".to_string());
        }
        if self.audio.sample_buffer_len < fft {
            return Err("audio.sample_buffer_len must be >= audio.fft_size".to_string());
        }
        if self.audio.tick_ms == 0 {
            return Err("audio.tick_ms must be >= 1".to_string());
        }
        if !(1..=MAX_FPS).contains(&self.visualizer.fps) {
            return Err(format!("visualizer.fps must be within 1..={MAX_FPS}"));
        }
        let gap = self.visualizer.bar_gap;
        if !gap.is_finite() || gap < 0.0 {
            return Err(format!("visualizer.bar_gap must be finite and >= 0, got {gap}"));
        }
        let scale = self.visualizer.width_scale;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(format!("visualizer.width_scale must be finite and > 0, got {scale}"));
        }
        Ok(())
    }
}

/// Resolve the config path from `DROPDECK_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("DROPDECK_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/dropdeck/config.toml`
/// or `~/.config/dropdeck/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("dropdeck").join("config.toml"))
}
