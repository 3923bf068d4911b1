//! Player preferences and match configuration
//!
//! Persisted in LocalStorage on the web. Native builds read the same JSON
//! from the `ARCADE_SETTINGS` environment variable.

use serde::{Deserialize, Serialize};

use crate::consts::{SIM_DT_MS, STARTING_LIVES};

/// Longest player name sent with a score
pub const MAX_NAME_LEN: usize = 20;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Name attached to submitted scores; anonymous when unset
    pub player_name: Option<String>,
    /// Lives at the start of a match
    pub starting_lives: u8,
    /// Fixed match seed for reproducible runs; random when unset
    pub seed: Option<u64>,
    /// Simulation step in milliseconds
    pub tick_ms: u64,
    /// Send the final score to the score service
    pub submit_scores: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_name: None,
            starting_lives: STARTING_LIVES,
            seed: None,
            tick_ms: SIM_DT_MS,
            submit_scores: true,
        }
    }
}

impl Settings {
    /// Copy with every field pulled back into its accepted range
    pub fn validated(&self) -> Self {
        let player_name = self
            .player_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| name.chars().take(MAX_NAME_LEN).collect());
        Self {
            player_name,
            starting_lives: self.starting_lives.clamp(1, 9),
            seed: self.seed,
            tick_ms: self.tick_ms.clamp(4, 50),
            submit_scores: self.submit_scores,
        }
    }

    /// Parse settings JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Settings>(json).map(|s| s.validated())
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "arcade_cabinet_settings";

    /// Environment variable holding settings JSON on native builds
    pub const ENV_VAR: &'static str = "ARCADE_SETTINGS";

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
                    Err(err) => log::warn!("Ignoring stored settings: {err}"),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native: read `ARCADE_SETTINGS` when set
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        match std::env::var(Self::ENV_VAR) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", Self::ENV_VAR);
                    settings
                }
                Err(err) => {
                    log::warn!("Ignoring {}: {err}", Self::ENV_VAR);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.starting_lives, 3);
        assert_eq!(settings.tick_ms, 16);
        assert!(settings.submit_scores);
        assert_eq!(settings.player_name, None);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{"player_name":"  ada  ","seed":42}"#).unwrap();
        assert_eq!(settings.player_name.as_deref(), Some("ada"));
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.starting_lives, 3);
    }

    #[test]
    fn test_validated_clamps() {
        let settings = Settings {
            player_name: Some("   ".into()),
            starting_lives: 0,
            seed: None,
            tick_ms: 1000,
            submit_scores: false,
        }
        .validated();
        assert_eq!(settings.player_name, None);
        assert_eq!(settings.starting_lives, 1);
        assert_eq!(settings.tick_ms, 50);

        let long = Settings {
            player_name: Some("x".repeat(64)),
            ..Default::default()
        }
        .validated();
        assert_eq!(long.player_name.map(|n| n.len()), Some(MAX_NAME_LEN));
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(Settings::from_json("{not json").is_err());
    }
}
