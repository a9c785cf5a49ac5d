//! Data-driven game balance
//!
//! Every physics and spawning constant the simulation reads goes through
//! [`Tuning`]. Defaults reproduce the shipped game; an override can be loaded
//! as JSON (LocalStorage on web) for balancing experiments.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Reasons a tuning override is rejected
#[derive(Debug, thiserror::Error)]
pub enum TuningError {
    #[error("malformed tuning override: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{name} must be finite, got {value}")]
    NotFinite { name: &'static str, value: f32 },
    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: f32 },
    #[error("speed increment must not be negative, got {0}")]
    NegativeIncrement(f32),
    #[error("{name} range is inverted: min={min}, max={max}")]
    InvertedRange {
        name: &'static str,
        min: f32,
        max: f32,
    },
    #[error("jump velocity must point upward (negative), got {0}")]
    JumpNotUpward(f32),
}

/// Balance values for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub gravity: f32,
    pub jump_velocity: f32,
    pub speed_initial: f32,
    pub speed_increment: f32,
    pub gap_min: f32,
    pub gap_max: f32,
    pub height_min: f32,
    pub height_max: f32,
    pub spawn_cursor_initial: f32,
    pub spawn_lookahead: f32,
    pub spawn_offset: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            jump_velocity: JUMP_VELOCITY,
            speed_initial: GAME_SPEED_INITIAL,
            speed_increment: GAME_SPEED_INCREMENT,
            gap_min: OBSTACLE_GAP_MIN,
            gap_max: OBSTACLE_GAP_MAX,
            height_min: OBSTACLE_HEIGHT_MIN,
            height_max: OBSTACLE_HEIGHT_MAX,
            spawn_cursor_initial: SPAWN_CURSOR_INITIAL,
            spawn_lookahead: SPAWN_LOOKAHEAD,
            spawn_offset: SPAWN_OFFSET,
        }
    }
}

impl Tuning {
    /// Check the values the simulation relies on: positive speed,
    /// non-negative ramp, ordered ranges, upward jump.
    pub fn validate(&self) -> Result<(), TuningError> {
        let fields = [
            ("gravity", self.gravity),
            ("jump_velocity", self.jump_velocity),
            ("speed_initial", self.speed_initial),
            ("speed_increment", self.speed_increment),
            ("gap_min", self.gap_min),
            ("gap_max", self.gap_max),
            ("height_min", self.height_min),
            ("height_max", self.height_max),
            ("spawn_cursor_initial", self.spawn_cursor_initial),
            ("spawn_lookahead", self.spawn_lookahead),
            ("spawn_offset", self.spawn_offset),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(TuningError::NotFinite { name, value });
            }
        }

        if self.speed_initial <= 0.0 {
            return Err(TuningError::NotPositive {
                name: "speed_initial",
                value: self.speed_initial,
            });
        }
        if self.gravity <= 0.0 {
            return Err(TuningError::NotPositive {
                name: "gravity",
                value: self.gravity,
            });
        }
        if self.speed_increment < 0.0 {
            return Err(TuningError::NegativeIncrement(self.speed_increment));
        }
        if self.jump_velocity >= 0.0 {
            return Err(TuningError::JumpNotUpward(self.jump_velocity));
        }
        if self.gap_min > self.gap_max {
            return Err(TuningError::InvertedRange {
                name: "gap",
                min: self.gap_min,
                max: self.gap_max,
            });
        }
        if self.height_min > self.height_max {
            return Err(TuningError::InvertedRange {
                name: "height",
                min: self.height_min,
                max: self.height_max,
            });
        }
        if self.height_min <= 0.0 {
            return Err(TuningError::NotPositive {
                name: "height_min",
                value: self.height_min,
            });
        }
        Ok(())
    }

    /// Parse a JSON override; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// LocalStorage key for the optional override
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "neon_dash_tuning";

    /// Load the override from LocalStorage, falling back to defaults
    pub fn load() -> Self {
        match crate::platform::storage_get(Self::STORAGE_KEY) {
            Some(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning override");
                    tuning
                }
                Err(e) => {
                    log::warn!("Ignoring tuning override: {}", e);
                    Self::default()
                }
            },
            None => Self::default(),
        }
    }
}
