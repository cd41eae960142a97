//! Notifications raised by the controller.

use deck_config::SwipeDirection;
use serde::{Deserialize, Serialize};

/// Something observers of the stack may want to react to. Drained with
/// [`crate::StackController::drain_events`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StackEvent {
    /// The card at data `index` was swiped off.
    DidSwipe {
        index: usize,
        direction: SwipeDirection,
    },
    /// The card at data `index` was put back on top.
    DidUndo {
        index: usize,
        direction: SwipeDirection,
    },
    /// The remaining cards rotated by `distance`.
    DidShift { distance: usize },
    /// The last remaining card was swiped.
    DidSwipeAllCards,
}
