//! Game settings
//!
//! Loaded from a JSON file on native and from LocalStorage on the web.
//! Missing fields fall back to the defaults in [`crate::consts`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Timing and size of one spawner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnerSettings {
    /// Seconds between spawn ticks
    pub interval: f32,
    /// Seconds a spawned entity takes to fall to its target
    pub descent_duration: f32,
    /// Sprite edge length
    pub sprite_size: f32,
}

impl SpawnerSettings {
    pub fn enemy() -> Self {
        Self {
            interval: ENEMY_SPAWN_INTERVAL,
            descent_duration: ENEMY_DESCENT_DURATION,
            sprite_size: ENEMY_SIZE,
        }
    }

    pub fn coin() -> Self {
        Self {
            interval: COIN_SPAWN_INTERVAL,
            descent_duration: COIN_DESCENT_DURATION,
            sprite_size: COIN_SIZE,
        }
    }

    /// Replace non-positive or non-finite values with `fallback`'s
    fn sanitized(self, fallback: Self) -> Self {
        let pick = |v: f32, d: f32| if v.is_finite() && v > 0.0 { v } else { d };
        Self {
            interval: pick(self.interval, fallback.interval),
            descent_duration: pick(self.descent_duration, fallback.descent_duration),
            sprite_size: pick(self.sprite_size, fallback.sprite_size),
        }
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Screen ===
    /// Scene width in points
    pub screen_width: f32,
    /// Scene height in points
    pub screen_height: f32,

    // === Session ===
    /// Lives at start and after restart
    pub starting_lives: u32,
    /// Player sprite edge length
    pub player_size: f32,

    // === Spawners ===
    pub enemy: SpawnerSettings,
    pub coin: SpawnerSettings,
    /// How far below the player's row falling entities travel
    pub descent_overshoot: f32,

    /// Fixed RNG seed (None = seed from the clock)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width: REFERENCE_WIDTH,
            screen_height: REFERENCE_HEIGHT,

            starting_lives: STARTING_LIVES,
            player_size: PLAYER_SIZE,

            enemy: SpawnerSettings::enemy(),
            coin: SpawnerSettings::coin(),
            descent_overshoot: DESCENT_OVERSHOOT,

            seed: None,
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "coin_dodge_settings";

    pub fn screen_size(&self) -> Vec2 {
        Vec2::new(self.screen_width, self.screen_height)
    }

    /// Parse settings JSON, then sanitize it
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Settings>(json).map(Settings::sanitized)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Clamp values the game cannot run with back to defaults
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let positive = |v: f32, d: f32| if v.is_finite() && v > 0.0 { v } else { d };

        Self {
            screen_width: positive(self.screen_width, defaults.screen_width),
            screen_height: positive(self.screen_height, defaults.screen_height),
            starting_lives: self.starting_lives.max(1),
            player_size: positive(self.player_size, defaults.player_size),
            enemy: self.enemy.sanitized(defaults.enemy),
            coin: self.coin.sanitized(defaults.coin),
            descent_overshoot: if self.descent_overshoot.is_finite() {
                self.descent_overshoot.max(0.0)
            } else {
                defaults.descent_overshoot
            },
            seed: self.seed,
        }
    }

    /// Load settings from a JSON file, falling back to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Invalid settings in {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
