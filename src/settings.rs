//! Session bootstrap and tuning
//!
//! Read once at startup from a JSON file. Every field has a default, so a
//! file only needs the values it overrides.

use std::path::Path;

use glam::Vec4;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::Bounds;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Arena session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seed for food placement and player spawn jitter
    pub seed: u64,
    /// Width over height of the arena; height is always 2
    pub aspect: f32,

    // === Population ===
    /// Food kept in the arena at all times
    pub food_count: usize,
    pub food_size: f32,
    pub food_color: Vec4,
    /// Player-controlled circles
    pub mover_count: usize,
    pub mover_size: f32,
    pub mover_color: Vec4,
    pub mover_max_speed: f32,
    /// Players spawn uniformly in `[-jitter, jitter]^2`
    pub mover_spawn_jitter: f32,

    // === Tuning ===
    /// Extra reach when testing whether a player can eat
    pub eat_margin: f32,
    /// Player push-apart rate
    pub push_speed: f32,
    /// Absorption animation length (seconds)
    pub absorb_duration: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0,
            aspect: 1.0,

            food_count: FOOD_COUNT,
            food_size: FOOD_SIZE,
            food_color: Vec4::ONE,
            mover_count: MOVER_COUNT,
            mover_size: MOVER_SIZE,
            // Yellow
            mover_color: Vec4::new(1.0, 0.92, 0.016, 1.0),
            mover_max_speed: MOVER_MAX_SPEED,
            mover_spawn_jitter: MOVER_SPAWN_JITTER,

            eat_margin: EAT_MARGIN,
            push_speed: PUSH_SPEED,
            absorb_duration: ABSORB_DURATION,
        }
    }
}

impl Settings {
    /// Parse and validate settings JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from `path`
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings, falling back to defaults on any failure
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::from_file(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("{}; using default settings", e);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("aspect", self.aspect),
            ("food_size", self.food_size),
            ("mover_size", self.mover_size),
            ("absorb_duration", self.absorb_duration),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be greater than zero",
                });
            }
        }
        if self.mover_max_speed < 0.0 {
            return Err(ConfigError::Invalid {
                field: "mover_max_speed",
                reason: "must not be negative",
            });
        }
        // Food has to fit between the walls
        if self.food_size >= self.aspect.min(1.0) {
            return Err(ConfigError::Invalid {
                field: "food_size",
                reason: "larger than the arena",
            });
        }
        Ok(())
    }

    /// Arena rectangle implied by `aspect`
    pub fn bounds(&self) -> Bounds {
        Bounds::from_aspect(self.aspect)
    }
}
