//! Swipeable card stack.
//!
//! - [`StackAnimator`] decides how background cards move for reset, shift,
//!   swipe and undo, and for how long.
//! - [`StackController`] owns the cards and their data, runs commands and
//!   drives the animation clock through [`StackController::tick`].
//! - [`TransformProvider`] supplies card geometry; [`DefaultTransformProvider`]
//!   is driven by [`deck_config::LayoutConfig`].
//!
//! The animator only talks to the [`CardStack`] trait, so it can be exercised
//! against any stack implementation.

pub mod animator;
pub mod card;
pub mod controller;
pub mod error;
pub mod events;
pub mod provider;
pub mod scheduler;
pub mod source;
pub mod stack;
pub mod state;
pub mod timing;

pub use animator::StackAnimator;
pub use card::{Card, CardId, DragState};
pub use controller::StackController;
pub use error::{Result, StackError};
pub use events::StackEvent;
pub use provider::{DefaultTransformProvider, TransformProvider};
pub use scheduler::{AnimationScheduler, Frame};
pub use source::{CardDataSource, VecDataSource};
pub use stack::{CardStack, Completion, VisibleCardSlot};
pub use state::{StackState, Swipe};
