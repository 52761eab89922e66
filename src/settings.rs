//! Game settings and quality hints
//!
//! `GameConfig` is the operator-facing configuration boundary: values are
//! validated here, so the simulation always receives an in-range target.
//! Quality hints come from an injected `QualityProvider`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{DEFAULT_TARGET_SCORE, MAX_TARGET_SCORE, MIN_TARGET_SCORE};

/// Rejected configuration changes
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("target score {value} outside 1..=200")]
    TargetOutOfRange { value: i64 },
    #[error("target score {0:?} is not a number")]
    InvalidTarget(String),
    #[error("reward message is empty")]
    EmptyMessage,
    #[error("no reward message at index {index} (have {len})")]
    MessageIndex { index: usize, len: usize },
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Operator configuration, read by the core at session reset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Hearts needed to win, 1..=200
    pub target_score: u32,
    /// Shown in order at every 10th point, wrapping around
    pub reward_messages: Vec<String>,
    /// Background music preference
    pub music_enabled: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            target_score: DEFAULT_TARGET_SCORE,
            reward_messages: [
                "You're my sunshine!",
                "Every heartbeat is for you!",
                "You make my world complete!",
                "Forever and always yours!",
                "You're my happy place!",
                "You light up my world!",
                "My heart skips for you!",
                "You're my dream come true!",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            music_enabled: true,
        }
    }
}

impl GameConfig {
    /// Set the target score, keeping the old one if out of range
    pub fn set_target_score(&mut self, value: u32) -> Result<(), ConfigError> {
        if !(MIN_TARGET_SCORE..=MAX_TARGET_SCORE).contains(&value) {
            return Err(ConfigError::TargetOutOfRange {
                value: value as i64,
            });
        }
        self.target_score = value;
        Ok(())
    }

    /// Parse and set a target score typed by the operator
    pub fn parse_target_score(&mut self, text: &str) -> Result<(), ConfigError> {
        let value: i64 = text
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidTarget(text.to_string()))?;
        let value = u32::try_from(value).map_err(|_| ConfigError::TargetOutOfRange { value })?;
        self.set_target_score(value)
    }

    /// Append a reward message (trimmed)
    pub fn add_message(&mut self, text: &str) -> Result<(), ConfigError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ConfigError::EmptyMessage);
        }
        self.reward_messages.push(text.to_string());
        Ok(())
    }

    /// Remove and return the reward message at `index`
    pub fn remove_message(&mut self, index: usize) -> Result<String, ConfigError> {
        if index >= self.reward_messages.len() {
            return Err(ConfigError::MessageIndex {
                index,
                len: self.reward_messages.len(),
            });
        }
        Ok(self.reward_messages.remove(index))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_TARGET_SCORE..=MAX_TARGET_SCORE).contains(&self.target_score) {
            return Err(ConfigError::TargetOutOfRange {
                value: self.target_score as i64,
            });
        }
        if self.reward_messages.iter().any(|m| m.trim().is_empty()) {
            return Err(ConfigError::EmptyMessage);
        }
        Ok(())
    }

    /// Parse and validate a JSON config; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        log::info!(
            "Loaded config: target {}, {} reward messages",
            config.target_score,
            config.reward_messages.len()
        );
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Particles a renderer should draw at most
    pub fn particle_budget(&self) -> usize {
        match self {
            QualityPreset::Low => 20,
            QualityPreset::Medium => 35,
            QualityPreset::High => 80,
        }
    }
}

/// Read-only quality snapshot consumed at session reset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualitySettings {
    pub preset: QualityPreset,
    pub particle_budget: usize,
    /// False mutes every cue from the next session reset on
    pub audio_enabled: bool,
}

impl Default for QualitySettings {
    fn default() -> Self {
        Self {
            preset: QualityPreset::Medium,
            particle_budget: 50,
            audio_enabled: true,
        }
    }
}

impl QualitySettings {
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            preset,
            particle_budget: preset.particle_budget(),
            ..Default::default()
        }
    }
}

/// Source of quality hints (device detection, telemetry, fixed settings)
pub trait QualityProvider {
    fn quality_settings(&self) -> QualitySettings;
}

impl QualityProvider for QualitySettings {
    fn quality_settings(&self) -> QualitySettings {
        *self
    }
}

/// Screen size class by smallest dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenClass {
    Small,
    Medium,
    Large,
    XLarge,
}

/// Host operating system family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Platform {
    Android,
    Ios,
    #[default]
    Web,
}

/// Rough memory tier from RAM and core count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryClass {
    Low,
    Medium,
    High,
}

/// Device facts gathered by the host shell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviceProfile {
    /// min(screen width, screen height) in CSS pixels
    pub min_screen_dimension: u32,
    pub device_memory_gb: f32,
    pub hardware_concurrency: u32,
    pub has_audio: bool,
    #[serde(default)]
    pub platform: Platform,
    /// Major OS version; unknown Android versions count as 7
    #[serde(default)]
    pub os_major_version: Option<u32>,
}

impl DeviceProfile {
    pub fn screen_class(&self) -> ScreenClass {
        match self.min_screen_dimension {
            0..480 => ScreenClass::Small,
            480..600 => ScreenClass::Medium,
            600..720 => ScreenClass::Large,
            _ => ScreenClass::XLarge,
        }
    }

    pub fn memory_class(&self) -> MemoryClass {
        if self.device_memory_gb >= 6.0 && self.hardware_concurrency >= 6 {
            MemoryClass::High
        } else if self.device_memory_gb >= 3.0 && self.hardware_concurrency >= 4 {
            MemoryClass::Medium
        } else {
            MemoryClass::Low
        }
    }

    /// Preset from memory class, with newer Android releases trusted more
    pub fn performance_level(&self) -> QualityPreset {
        let memory = self.memory_class();
        if self.platform == Platform::Android {
            let version = self.os_major_version.unwrap_or(7);
            if version >= 12 && memory == MemoryClass::High {
                return QualityPreset::High;
            }
            if version >= 10 && memory != MemoryClass::Low {
                return QualityPreset::Medium;
            }
        }
        if memory == MemoryClass::High {
            QualityPreset::Medium
        } else {
            QualityPreset::Low
        }
    }

    pub fn optimal_settings(&self) -> QualitySettings {
        let preset = self.performance_level();
        let base = preset.particle_budget();
        // 0.7x on small screens, 1.3x on xlarge, rounded down
        let budget = match self.screen_class() {
            ScreenClass::Small => base * 7 / 10,
            ScreenClass::XLarge => base * 13 / 10,
            ScreenClass::Medium | ScreenClass::Large => base,
        };
        QualitySettings {
            preset,
            particle_budget: budget,
            audio_enabled: self.has_audio,
        }
    }
}

impl QualityProvider for DeviceProfile {
    fn quality_settings(&self) -> QualitySettings {
        self.optimal_settings()
    }
}
