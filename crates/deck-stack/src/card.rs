//! Card model.
//!
//! A `Card` is the visual unit the stack moves around. It carries its own
//! pose, animation tuning and drag gesture state, but never its position in
//! the stack: positions live in the controller's slot list.

use deck_animation::Transform2D;
use deck_config::{CardAnimationOptions, SwipeDirection};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identity of a card for the lifetime of the process.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct CardId(pub u64);

impl CardId {
    /// Generate a new unique card ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for CardId {
    fn default() -> Self {
        Self::new()
    }
}

/// Live drag gesture state, in points and points per second.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DragState {
    /// Offset from where the drag began.
    pub translation: (f64, f64),
    /// Instantaneous velocity.
    pub velocity: (f64, f64),
    /// `1.0` when grabbed in the top half, `-1.0` in the bottom half.
    pub rotation_direction_y: f64,
}

impl DragState {
    /// Drag grabbed at `touch_y` on a card `height` points tall.
    pub fn began_at(touch_y: f64, height: f64) -> Self {
        Self {
            translation: (0.0, 0.0),
            velocity: (0.0, 0.0),
            rotation_direction_y: if touch_y < height / 2.0 { 1.0 } else { -1.0 },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub id: CardId,
    pub content: String,
    pub transform: Transform2D,
    pub options: CardAnimationOptions,
    pub drag: DragState,
}

impl Card {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: CardId::new(),
            content: content.into(),
            transform: Transform2D::identity(),
            options: CardAnimationOptions::default(),
            drag: DragState::default(),
        }
    }

    pub fn with_options(mut self, options: CardAnimationOptions) -> Self {
        self.options = options;
        self
    }

    /// Speed of the current drag projected onto `direction`.
    pub fn drag_speed(&self, direction: SwipeDirection) -> f64 {
        let (dx, dy) = direction.vector();
        let (vx, vy) = self.drag.velocity;
        (vx * dx + vy * dy).abs()
    }

    /// Minimum drag speed that counts as a swipe in `direction`.
    pub fn minimum_swipe_speed(&self, direction: SwipeDirection) -> f64 {
        self.options.minimum_swipe_speed(direction)
    }

    /// Drag distance along `direction` relative to the card size. Zero when
    /// dragged the opposite way.
    pub fn drag_percentage(&self, direction: SwipeDirection, width: f64, height: f64) -> f64 {
        if width <= 0.0 || height <= 0.0 {
            return 0.0;
        }
        let (dx, dy) = direction.vector();
        let (tx, ty) = self.drag.translation;
        (tx / width * dx + ty / height * dy).max(0.0)
    }

    pub fn reset_drag(&mut self) {
        self.drag = DragState::default();
    }
}
