//! Animation tuning options, at stack and card scope.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Direction a card can be swiped off the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeDirection {
    Left,
    Right,
    Up,
    Down,
}

impl SwipeDirection {
    /// All four directions.
    pub const ALL: [SwipeDirection; 4] = [Self::Left, Self::Right, Self::Up, Self::Down];

    /// Unit vector in screen coordinates (y grows downward).
    pub fn vector(&self) -> (f64, f64) {
        match self {
            Self::Left => (-1.0, 0.0),
            Self::Right => (1.0, 0.0),
            Self::Up => (0.0, -1.0),
            Self::Down => (0.0, 1.0),
        }
    }

    /// Whether the direction is horizontal.
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

/// Stack-scope durations, in seconds.
///
/// `None` means "derive from the top card's [`CardAnimationOptions`]". The
/// shift duration has no card-level counterpart and is always explicit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackAnimationOptions {
    /// Background cards returning after a cancelled drag.
    pub reset_duration: Option<f64>,
    /// Visible cards sliding into new positions after a shift.
    pub shift_duration: f64,
    /// Background cards moving up after a swipe.
    pub swipe_duration: Option<f64>,
    /// Background cards moving back after an undo.
    pub undo_duration: Option<f64>,
}

impl Default for StackAnimationOptions {
    fn default() -> Self {
        Self {
            reset_duration: None,
            shift_duration: 0.1,
            swipe_duration: None,
            undo_duration: None,
        }
    }
}

/// Card-scope animation options, in seconds unless noted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardAnimationOptions {
    /// Full reset animation of a card released short of a swipe.
    pub total_reset_duration: f64,
    /// Full animation of a card returning on undo.
    pub total_reverse_swipe_duration: f64,
    /// Full animation of a card leaving the stack.
    pub total_swipe_duration: f64,
    /// Overlay fade as a fraction (0..1) of `total_swipe_duration`.
    pub relative_swipe_overlay_fade_duration: f64,
    /// Drag speed, in points per second, that counts as a swipe.
    pub minimum_swipe_speed: f64,
    /// Per-direction overrides of `minimum_swipe_speed`.
    pub directional_minimum_swipe_speed: BTreeMap<SwipeDirection, f64>,
}

impl Default for CardAnimationOptions {
    fn default() -> Self {
        Self {
            total_reset_duration: 0.6,
            total_reverse_swipe_duration: 0.25,
            total_swipe_duration: 0.7,
            relative_swipe_overlay_fade_duration: 0.15,
            minimum_swipe_speed: 1100.0,
            directional_minimum_swipe_speed: BTreeMap::new(),
        }
    }
}

impl CardAnimationOptions {
    /// Minimum swipe speed for `direction`.
    pub fn minimum_swipe_speed(&self, direction: SwipeDirection) -> f64 {
        self.directional_minimum_swipe_speed
            .get(&direction)
            .copied()
            .unwrap_or(self.minimum_swipe_speed)
    }

    /// Overlay fade fraction clamped into `0.0..=1.0`.
    pub fn overlay_fade_fraction(&self) -> f64 {
        self.relative_swipe_overlay_fade_duration.clamp(0.0, 1.0)
    }
}

/// Both option scopes, as loaded from the `[animation]` table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Stack-scope durations.
    pub stack: StackAnimationOptions,
    /// Defaults for every card the stack creates.
    pub card: CardAnimationOptions,
}
