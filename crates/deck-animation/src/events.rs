//! Lifecycle events emitted by the animation clock.
//!
//! The clock never calls back into its owner. It queues events instead, and
//! the owner drains them after each `update` and dispatches whatever
//! completion work it registered under the event's `AnimationId`.
//!
//! ```ignore
//! clock.update(1.0 / 60.0);
//! for event in clock.drain_events() {
//!     if let Some(finished) = event.completion() {
//!         // run the completion registered for event.animation_id()
//!     }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::types::AnimationId;

/// Event emitted when a scheduled animation changes state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnimationEvent {
    /// A keyframe group was scheduled.
    Started {
        /// The group ID.
        animation_id: AnimationId,
        /// Name of the group.
        name: String,
    },
    /// A keyframe group ran to its end with every track intact.
    Ended {
        /// The group ID.
        animation_id: AnimationId,
        /// Name of the group.
        name: String,
    },
    /// A keyframe group lost one or more tracks before finishing.
    Cancelled {
        /// The group ID.
        animation_id: AnimationId,
        /// Name of the group.
        name: String,
    },
    /// A deferred timer reached its deadline.
    TimerFired {
        /// The timer ID.
        animation_id: AnimationId,
    },
}

impl AnimationEvent {
    /// Get the animation ID for this event.
    pub fn animation_id(&self) -> AnimationId {
        match self {
            Self::Started { animation_id, .. }
            | Self::Ended { animation_id, .. }
            | Self::Cancelled { animation_id, .. }
            | Self::TimerFired { animation_id } => *animation_id,
        }
    }

    /// The `finished` flag to hand to a completion, or `None` for events
    /// that do not end an animation.
    pub fn completion(&self) -> Option<bool> {
        match self {
            Self::Started { .. } => None,
            Self::Ended { .. } | Self::TimerFired { .. } => Some(true),
            Self::Cancelled { .. } => Some(false),
        }
    }

    /// Check if this is a "started" event.
    pub fn is_started(&self) -> bool {
        matches!(self, Self::Started { .. })
    }

    /// Check if this is a "cancelled" event.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

/// FIFO queue of events collected between drains.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<AnimationEvent>,
}

impl EventQueue {
    /// Create a new empty event queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an event.
    pub fn push(&mut self, event: AnimationEvent) {
        self.events.push_back(event);
    }

    /// Check if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Drain all events in order.
    pub fn drain(&mut self) -> impl Iterator<Item = AnimationEvent> + '_ {
        self.events.drain(..)
    }

    /// Clear all pending events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
