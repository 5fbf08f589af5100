//! Tempo configuration file handling

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tempo_animation::{DriverConfig, Easing, IdleValue, RepeatMode, StatePolicy, UploadLayout};

/// Default config file looked up in the working directory
pub const CONFIG_FILE: &str = "tempo.toml";

/// Top-level Tempo configuration (tempo.toml)
#[derive(Debug, Default, PartialEq, Deserialize)]
pub struct TempoConfig {
    #[serde(default)]
    pub driver: DriverOverrides,
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub upload: UploadConfig,
}

/// Overrides applied on top of a widget's preset driver
#[derive(Debug, Default, PartialEq, Deserialize)]
pub struct DriverOverrides {
    /// Length of one iteration in milliseconds
    #[serde(default)]
    pub duration_ms: Option<u32>,
    /// Progress easing: a preset name, `power(p)` or `cubic-bezier(...)`
    #[serde(default)]
    pub easing: Option<String>,
    /// Number of iterations; 0 repeats forever
    #[serde(default)]
    pub repeat: Option<u32>,
    #[serde(default)]
    pub idle: IdleSetting,
    #[serde(default)]
    pub policy: PolicySetting,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdleSetting {
    #[default]
    Hold,
    Reset,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicySetting {
    #[default]
    Lenient,
    Strict,
}

/// Headless playback settings
#[derive(Debug, PartialEq, Deserialize)]
pub struct PlaybackConfig {
    /// Simulated frame rate
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Stop looping runs after this much simulated time
    #[serde(default = "default_max_ms")]
    pub max_ms: u32,
    /// Cancel the run once this much time has elapsed
    #[serde(default)]
    pub cancel_at_ms: Option<u32>,
}

fn default_fps() -> u32 {
    60
}

fn default_max_ms() -> u32 {
    10_000
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            max_ms: default_max_ms(),
            cancel_at_ms: None,
        }
    }
}

impl PlaybackConfig {
    /// Milliseconds between simulated frames
    pub fn frame_ms(&self) -> f32 {
        1000.0 / self.fps.max(1) as f32
    }
}

/// Upload indicator geometry
#[derive(Debug, PartialEq, Deserialize)]
pub struct UploadConfig {
    #[serde(default = "default_box_size")]
    pub box_size: f32,
    #[serde(default = "default_cloud_size")]
    pub cloud_size: f32,
}

fn default_box_size() -> f32 {
    UploadLayout::default().box_size
}

fn default_cloud_size() -> f32 {
    UploadLayout::default().cloud_size
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            box_size: default_box_size(),
            cloud_size: default_cloud_size(),
        }
    }
}

impl UploadConfig {
    pub fn layout(&self) -> UploadLayout {
        UploadLayout {
            box_size: self.box_size,
            cloud_size: self.cloud_size,
        }
    }
}

impl DriverOverrides {
    /// Apply the overrides to a preset driver configuration
    pub fn apply(&self, mut config: DriverConfig) -> Result<DriverConfig> {
        if let Some(duration_ms) = self.duration_ms {
            config.duration_ms = duration_ms;
        }
        if let Some(easing) = &self.easing {
            config.easing = easing
                .parse::<Easing>()
                .with_context(|| format!("Invalid driver easing `{easing}`"))?;
        }
        if let Some(repeat) = self.repeat {
            config.repeat = match repeat {
                0 => RepeatMode::Infinite,
                1 => RepeatMode::Once,
                n => RepeatMode::Count(n),
            };
        }
        config.idle = match self.idle {
            IdleSetting::Hold => IdleValue::Hold,
            IdleSetting::Reset => IdleValue::Reset,
        };
        config.policy = match self.policy {
            PolicySetting::Lenient => StatePolicy::Lenient,
            PolicySetting::Strict => StatePolicy::Strict,
        };
        config.validate().context("Invalid driver configuration")?;
        Ok(config)
    }
}

impl TempoConfig {
    /// Load configuration from an explicit path, or from `tempo.toml` in the
    /// working directory when present
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None if Path::new(CONFIG_FILE).exists() => Self::load_from(Path::new(CONFIG_FILE)),
            None => {
                tracing::debug!("No {} found, using defaults", CONFIG_FILE);
                Ok(Self::default())
            }
        }
    }

    fn load_from(path: &Path) -> Result<Self> {
        let config_path = if path.is_dir() {
            path.join(CONFIG_FILE)
        } else {
            path.to_path_buf()
        };

        if !config_path.exists() {
            anyhow::bail!("No config found at {}", config_path.display());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let config = Self::parse(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        tracing::debug!("Loaded configuration from {}", config_path.display());
        Ok(config)
    }

    /// Parse a TOML document
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TempoConfig::parse("").unwrap();
        assert_eq!(config, TempoConfig::default());
        assert_eq!(config.playback.fps, 60);
        assert_eq!(config.upload.layout(), UploadLayout::default());
    }

    #[test]
    fn test_overrides_apply_to_preset() {
        let config = TempoConfig::parse(
            r#"
            [driver]
            duration_ms = 2000
            easing = "fast-out-slow-in"
            repeat = 0
            idle = "reset"
            policy = "strict"

            [playback]
            fps = 120
            cancel_at_ms = 500
            "#,
        )
        .unwrap();

        let driver = config.driver.apply(DriverConfig::new(4000)).unwrap();
        assert_eq!(driver.duration_ms, 2000);
        assert_eq!(driver.easing, Easing::FAST_OUT_SLOW_IN);
        assert_eq!(driver.repeat, RepeatMode::Infinite);
        assert_eq!(driver.idle, IdleValue::Reset);
        assert_eq!(driver.policy, StatePolicy::Strict);
        assert_eq!(config.playback.cancel_at_ms, Some(500));
        assert!((config.playback.frame_ms() - 8.333).abs() < 1e-3);
    }

    #[test]
    fn test_invalid_easing_is_reported() {
        let overrides = DriverOverrides {
            easing: Some("cubic-bezier(1.5, 0, 1, 1)".into()),
            ..Default::default()
        };
        let err = overrides.apply(DriverConfig::new(100)).unwrap_err();
        assert!(err.to_string().contains("Invalid driver easing"));
    }

    #[test]
    fn test_zero_duration_is_rejected() {
        let overrides = DriverOverrides {
            duration_ms: Some(0),
            ..Default::default()
        };
        assert!(overrides.apply(DriverConfig::new(100)).is_err());
    }

    #[test]
    fn test_missing_explicit_path_fails() {
        let err = TempoConfig::load(Some(Path::new("/nonexistent/tempo.toml"))).unwrap_err();
        assert!(err.to_string().contains("No config found"));
    }
}
