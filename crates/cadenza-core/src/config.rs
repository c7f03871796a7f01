use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::motion::{self, CapabilityTier, DurationClass};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub motion: MotionConfig,
    #[serde(default)]
    pub frame: FrameConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            motion: MotionConfig::default(),
            frame: FrameConfig::default(),
            scroll: ScrollConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionConfig {
    /// Disable animated transitions entirely
    #[serde(default)]
    pub reduced_motion: bool,
    /// Declared host capability: "low", "standard", "high"
    #[serde(default)]
    pub capability: CapabilityTier,
    /// User multiplier applied on top of the duration presets
    #[serde(default = "default_duration_scale")]
    pub duration_scale: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            reduced_motion: false,
            capability: CapabilityTier::default(),
            duration_scale: default_duration_scale(),
        }
    }
}

impl MotionConfig {
    /// Effective duration for an animation class under this configuration
    pub fn duration(&self, class: DurationClass) -> Duration {
        let base = motion::duration_for(class, self.capability, self.reduced_motion);
        if self.duration_scale.is_finite() && self.duration_scale > 0.0 {
            base.mul_f64(self.duration_scale)
        } else {
            base
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameConfig {
    /// Target frame rate (0 = derive from capability tier)
    #[serde(default)]
    pub target_fps: u16,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self { target_fps: 0 }
    }
}

impl FrameConfig {
    /// Frame rate after applying the tier preset fallback
    pub fn effective_fps(&self, tier: CapabilityTier) -> u16 {
        if self.target_fps == 0 {
            motion::fps_for(tier)
        } else {
            self.target_fps
        }
    }

    /// Event loop tick interval for the effective frame rate
    pub fn tick_interval(&self, tier: CapabilityTier) -> Duration {
        motion::frame_interval(self.effective_fps(tier))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Quiet window in milliseconds before scroll activity is considered over
    #[serde(default = "default_quiet_ms")]
    pub quiet_ms: u64,
    /// Lines scrolled per wheel step
    #[serde(default = "default_scroll_lines")]
    pub lines: u16,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            quiet_ms: default_quiet_ms(),
            lines: default_scroll_lines(),
        }
    }
}

impl ScrollConfig {
    /// Quiet window as a Duration
    pub fn quiet_window(&self) -> Duration {
        Duration::from_millis(self.quiet_ms)
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_duration_scale() -> f64 {
    1.0
}

fn default_quiet_ms() -> u64 {
    150
}

fn default_scroll_lines() -> u16 {
    3
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(&config_path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/cadenza/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("cadenza")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(!config.motion.reduced_motion);
        assert_eq!(config.motion.capability, CapabilityTier::Standard);
        assert_eq!(config.frame.target_fps, 0);
        assert_eq!(config.scroll.quiet_ms, 150);
        assert_eq!(config.scroll.lines, 3);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [motion]
            reduced_motion = true
            capability = "low"
            "#,
        )
        .unwrap();
        assert!(config.motion.reduced_motion);
        assert_eq!(config.motion.capability, CapabilityTier::Low);
        assert_eq!(config.motion.duration_scale, 1.0);
        assert_eq!(config.scroll.quiet_ms, 150);
    }

    #[test]
    fn test_reduced_motion_duration() {
        let config = AppConfig {
            motion: MotionConfig {
                reduced_motion: true,
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(config.motion.duration(DurationClass::Medium), Duration::ZERO);
    }

    #[test]
    fn test_duration_scale() {
        let config = MotionConfig {
            duration_scale: 2.0,
            ..Default::default()
        };
        let base = motion::duration_for(DurationClass::Short, CapabilityTier::Standard, false);
        assert_eq!(config.duration(DurationClass::Short), base.mul_f64(2.0));
    }

    #[test]
    fn test_invalid_duration_scale_falls_back() {
        let config = MotionConfig {
            duration_scale: -1.0,
            ..Default::default()
        };
        let base = motion::duration_for(DurationClass::Short, CapabilityTier::Standard, false);
        assert_eq!(config.duration(DurationClass::Short), base);
    }

    #[test]
    fn test_effective_fps() {
        let frame = FrameConfig { target_fps: 0 };
        assert_eq!(frame.effective_fps(CapabilityTier::Low), 30);
        assert_eq!(frame.effective_fps(CapabilityTier::Standard), 60);

        let frame = FrameConfig { target_fps: 120 };
        assert_eq!(frame.effective_fps(CapabilityTier::Low), 120);
    }
}
