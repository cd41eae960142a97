//! Swipe deck configuration system
//!
//! Loads stack layout and animation tuning from `deck.toml`, with environment
//! variables taking precedence for quick experiments.

mod animation;
mod error;

pub use animation::{AnimationConfig, CardAnimationOptions, StackAnimationOptions, SwipeDirection};
pub use error::ConfigError;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file name, looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "deck.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    /// Animation durations and swipe thresholds
    pub animation: AnimationConfig,
    /// Stack geometry
    pub layout: LayoutConfig,
}

/// Stack geometry configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// How many cards are on screen at once
    pub number_of_visible_cards: usize,
    /// Scale applied to every card behind the top card
    pub background_scale: f64,
    /// Card width in points
    pub card_width: f64,
    /// Card height in points
    pub card_height: f64,
    /// Largest rotation of a dragged card, in radians
    pub maximum_rotation_angle: f64,
    /// Directions a card may be swiped in
    pub swipe_directions: Vec<SwipeDirection>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            number_of_visible_cards: 2,
            background_scale: 0.95,
            card_width: 320.0,
            card_height: 480.0,
            maximum_rotation_angle: std::f64::consts::PI / 10.0,
            swipe_directions: vec![SwipeDirection::Left, SwipeDirection::Right],
        }
    }
}

impl DeckConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Render configuration as pretty TOML
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load configuration from `deck.toml` in the current directory,
    /// or return default configuration if it is missing or invalid
    pub fn load_or_default() -> Self {
        Self::load_from_file(DEFAULT_CONFIG_FILE).unwrap_or_default()
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    /// Unparseable values are ignored.
    pub fn merge_with_env(&mut self) {
        let stack = &mut self.animation.stack;
        if let Some(secs) = env_f64("DECK_RESET_DURATION") {
            stack.reset_duration = Some(secs);
        }
        if let Some(secs) = env_f64("DECK_SHIFT_DURATION") {
            stack.shift_duration = secs;
        }
        if let Some(secs) = env_f64("DECK_SWIPE_DURATION") {
            stack.swipe_duration = Some(secs);
        }
        if let Some(secs) = env_f64("DECK_UNDO_DURATION") {
            stack.undo_duration = Some(secs);
        }

        let card = &mut self.animation.card;
        if let Some(secs) = env_f64("DECK_TOTAL_SWIPE_DURATION") {
            card.total_swipe_duration = secs;
        }
        if let Some(fraction) = env_f64("DECK_OVERLAY_FADE") {
            card.relative_swipe_overlay_fade_duration = fraction;
        }
        if let Some(speed) = env_f64("DECK_MIN_SWIPE_SPEED") {
            card.minimum_swipe_speed = speed;
        }

        if let Ok(val) = std::env::var("DECK_VISIBLE_CARDS") {
            if let Ok(count) = val.parse::<usize>() {
                self.layout.number_of_visible_cards = count;
            }
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from deck.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}

fn env_f64(key: &str) -> Option<f64> {
    std::env::var(key).ok()?.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = DeckConfig::default();
        assert_eq!(config.layout.number_of_visible_cards, 2);
        assert_eq!(config.animation.card.total_swipe_duration, 0.7);
        assert_eq!(config.animation.stack.shift_duration, 0.1);
    }

    #[test]
    fn test_toml_serialization() {
        let mut config = DeckConfig::default();
        config.animation.stack.undo_duration = Some(0.3);
        config
            .animation
            .card
            .directional_minimum_swipe_speed
            .insert(SwipeDirection::Up, 500.0);

        let toml_str = config.to_toml_string().unwrap();
        let parsed = DeckConfig::from_toml_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let parsed = DeckConfig::from_toml_str(
            r#"
            [animation.stack]
            swipe_duration = 0.4

            [layout]
            number_of_visible_cards = 3
            "#,
        )
        .unwrap();

        assert_eq!(parsed.animation.stack.swipe_duration, Some(0.4));
        assert_eq!(parsed.animation.stack.shift_duration, 0.1);
        assert_eq!(parsed.layout.number_of_visible_cards, 3);
        assert_eq!(parsed.layout.background_scale, 0.95);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[animation.card]\ntotal_swipe_duration = 1.0").unwrap();

        let config = DeckConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.animation.card.total_swipe_duration, 1.0);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = DeckConfig::load_from_file(&missing).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("nope.toml"));
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let err = DeckConfig::from_toml_str("[layout\nnumber_of_visible_cards = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_or_default() {
        // Should not panic even if deck.toml doesn't exist
        let config = DeckConfig::load_or_default();
        assert!(config.layout.number_of_visible_cards > 0);
    }

    #[test]
    fn test_merge_with_env() {
        unsafe {
            std::env::set_var("DECK_SWIPE_DURATION", "0.42");
            std::env::set_var("DECK_VISIBLE_CARDS", "4");
            std::env::set_var("DECK_MIN_SWIPE_SPEED", "not-a-number");
        }

        let mut config = DeckConfig::default();
        config.merge_with_env();

        assert_eq!(config.animation.stack.swipe_duration, Some(0.42));
        assert_eq!(config.layout.number_of_visible_cards, 4);
        assert_eq!(config.animation.card.minimum_swipe_speed, 1100.0);

        unsafe {
            std::env::remove_var("DECK_SWIPE_DURATION");
            std::env::remove_var("DECK_VISIBLE_CARDS");
            std::env::remove_var("DECK_MIN_SWIPE_SPEED");
        }
    }
}
