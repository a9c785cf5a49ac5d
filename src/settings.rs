//! Player settings and preferences
//!
//! Persisted in LocalStorage, separate from the leaderboard.

use serde::{Deserialize, Serialize};

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

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Whether to draw glow halos around the player and obstacles
    pub fn glow_enabled(&self) -> bool {
        match self {
            QualityPreset::Low => false,
            QualityPreset::Medium => true,
            QualityPreset::High => true,
        }
    }

    /// Whether to draw the scrolling grid under the ground line
    pub fn grid_enabled(&self) -> bool {
        match self {
            QualityPreset::Low => false,
            QualityPreset::Medium => false,
            QualityPreset::High => true,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Glow halos
    pub glow: bool,
    /// Scrolling ground grid
    pub ground_grid: bool,
    /// Tilt the player while jumping
    pub jump_tilt: bool,

    // === HUD ===
    /// Show the speed multiplier
    pub show_speed: bool,

    // === Accessibility ===
    /// Reduced motion (no tilt, static grid)
    pub reduced_motion: bool,

    // === Leaderboard ===
    /// Name prefilled on the game-over screen
    pub last_player_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::High,

            glow: true,
            ground_grid: true,
            jump_tilt: true,

            show_speed: true,

            reduced_motion: false,

            last_player_name: String::new(),
        }
    }
}

impl Settings {
    /// Apply a quality preset (updates quality-dependent settings)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;
        self.glow = preset.glow_enabled();
        self.ground_grid = preset.grid_enabled();
    }

    /// Effective glow (respects preset)
    pub fn effective_glow(&self) -> bool {
        self.glow && self.quality.glow_enabled()
    }

    /// Effective jump tilt (respects reduced_motion)
    pub fn effective_jump_tilt(&self) -> bool {
        self.jump_tilt && !self.reduced_motion
    }

    /// Whether the grid scrolls with distance (static under reduced_motion)
    pub fn grid_scrolls(&self) -> bool {
        !self.reduced_motion
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "neon_dash_settings";

    /// Load settings from LocalStorage, falling back to defaults
    pub fn load() -> Self {
        if let Some(json) = crate::platform::storage_get(Self::STORAGE_KEY) {
            match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring stored settings: {}", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage
    pub fn save(&self) {
        match serde_json::to_string(self) {
            Ok(json) => match crate::platform::storage_set(Self::STORAGE_KEY, &json) {
                Ok(()) => log::info!("Settings saved"),
                Err(e) => log::warn!("Settings not saved: {}", e),
            },
            Err(e) => log::warn!("Settings not serialized: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let mut settings = Settings::default();
        settings.apply_preset(QualityPreset::Low);
        assert!(!settings.effective_glow());
        assert!(!settings.ground_grid);

        settings.apply_preset(QualityPreset::High);
        assert!(settings.effective_glow());
        assert!(settings.ground_grid);

        let chosen = QualityPreset::parse(QualityPreset::Low.as_str());
        assert_eq!(chosen, Some(QualityPreset::Low));

        assert_eq!(QualityPreset::parse("MED"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::parse("ultra"), None);
    }

    #[test]
    fn test_reduced_motion_disables_tilt() {
        let mut settings = Settings::default();
        assert!(settings.effective_jump_tilt());
        settings.reduced_motion = true;
        assert!(!settings.effective_jump_tilt());
        assert!(!settings.grid_scrolls());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "reduced_motion": true }"#).unwrap();
        assert!(settings.reduced_motion);
        assert_eq!(settings.quality, QualityPreset::High);
        assert!(settings.last_player_name.is_empty());
    }
}
