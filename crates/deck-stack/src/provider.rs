//! Card transform strategy.
//!
//! The animator never computes geometry itself. Every resting pose and every
//! drag pose comes from a [`TransformProvider`], so a host can swap in its own
//! layout (fanned, offset, tilted) without touching the timing code.

use deck_animation::{Interpolate, Transform2D};
use deck_config::{LayoutConfig, SwipeDirection};

use crate::card::Card;

/// Pure mapping from stack state to card geometry.
///
/// Implementations must return the same value for the same input for the
/// duration of an animation; keyframe targets are computed once at
/// scheduling time.
pub trait TransformProvider {
    /// Resting transform for the card at `position` (0 = top).
    fn stack_transform(&self, position: usize) -> Transform2D;

    /// How far the dragged `card` has committed to `direction`, in `0.0..=1.0`.
    fn overlay_percentage(&self, card: &Card, direction: SwipeDirection) -> f64;

    /// Rotation of the dragged `card`, in radians.
    fn rotation_angle(&self, card: &Card) -> f64;

    /// Pose of the dragged `card` following the finger.
    fn drag_transform(&self, card: &Card) -> Transform2D;

    /// Off-screen pose a swiped `card` flies to. Forced swipes ignore the
    /// drag and leave straight along `direction`.
    fn swipe_transform(&self, card: &Card, direction: SwipeDirection, forced: bool) -> Transform2D;

    /// Pose of the card at `position` while `top_card` is dragged. Background
    /// cards move toward the next slot up as the overlay fills in.
    fn background_drag_transform(&self, top_card: &Card, position: usize) -> Transform2D {
        if position == 0 {
            return self.stack_transform(0);
        }
        let percentage = SwipeDirection::ALL
            .iter()
            .map(|direction| self.overlay_percentage(top_card, *direction))
            .fold(0.0, f64::max);

        self.stack_transform(position)
            .interpolate(&self.stack_transform(position - 1), percentage)
    }
}

/// Layout driven by [`LayoutConfig`]: the top card at identity, every card
/// behind it uniformly scaled.
#[derive(Debug, Clone)]
pub struct DefaultTransformProvider {
    layout: LayoutConfig,
}

impl DefaultTransformProvider {
    pub fn new(layout: LayoutConfig) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Allowed direction the card is currently dragged furthest toward.
    pub fn active_direction(&self, card: &Card) -> Option<SwipeDirection> {
        self.layout
            .swipe_directions
            .iter()
            .map(|direction| (*direction, self.drag_percentage(card, *direction)))
            .filter(|(_, percentage)| *percentage > 0.0)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(direction, _)| direction)
    }

    fn drag_percentage(&self, card: &Card, direction: SwipeDirection) -> f64 {
        card.drag_percentage(direction, self.layout.card_width, self.layout.card_height)
    }
}

impl Default for DefaultTransformProvider {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl TransformProvider for DefaultTransformProvider {
    fn stack_transform(&self, position: usize) -> Transform2D {
        if position == 0 {
            Transform2D::identity()
        } else {
            Transform2D::scale_uniform(self.layout.background_scale)
        }
    }

    fn overlay_percentage(&self, card: &Card, direction: SwipeDirection) -> f64 {
        if self.active_direction(card) != Some(direction) {
            return 0.0;
        }
        // Dragging diagonally between two allowed directions weakens both.
        let total: f64 = self
            .layout
            .swipe_directions
            .iter()
            .map(|d| self.drag_percentage(card, *d))
            .sum();
        let actual = 2.0 * self.drag_percentage(card, direction) - total;
        actual.clamp(0.0, 1.0)
    }

    fn rotation_angle(&self, card: &Card) -> f64 {
        if self.layout.card_width <= 0.0 {
            return 0.0;
        }
        let strength = (card.drag.translation.0 / self.layout.card_width).clamp(-1.0, 1.0);
        card.drag.rotation_direction_y * strength * self.layout.maximum_rotation_angle.abs()
    }

    fn drag_transform(&self, card: &Card) -> Transform2D {
        let (tx, ty) = card.drag.translation;
        Transform2D::translate(tx, ty).then(&Transform2D::rotate(self.rotation_angle(card)))
    }

    fn swipe_transform(&self, card: &Card, direction: SwipeDirection, forced: bool) -> Transform2D {
        let distance = 2.0 * self.layout.card_width.max(self.layout.card_height);
        let (tx, ty) = card.drag.translation;
        let length = (tx * tx + ty * ty).sqrt();
        let (dx, dy) = if forced || length == 0.0 {
            direction.vector()
        } else {
            (tx / length, ty / length)
        };

        let angle = if direction.is_horizontal() {
            let side = direction.vector().0;
            let grip = if forced { 1.0 } else { card.drag.rotation_direction_y };
            2.0 * side * grip * self.layout.maximum_rotation_angle.abs()
        } else {
            0.0
        };

        Transform2D::translate(dx * distance, dy * distance).then(&Transform2D::rotate(angle))
    }
}
