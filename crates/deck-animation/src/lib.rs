//! Keyframe animation primitives for the swipe deck.
//!
//! This crate provides:
//! - **Transforms**: `Transform2D` with decomposition-based interpolation
//! - **Keyframe groups**: per-target tracks sharing a duration, delay and easing
//! - **Animation clock**: a simulated clock that advances groups and deferred
//!   timers, supports per-target cancellation and queues lifecycle events
//! - **Easing functions**: standard cubic-bezier timing curves
//!
//! # Architecture
//!
//! ```text
//! AnimationClock<K>
//!   ├── Active keyframe groups (tracks keyed by target K)
//!   ├── Deferred timers (completion-only, no targets)
//!   └── EventQueue (Started / Ended / Cancelled / TimerFired)
//! ```

pub mod clock;
pub mod easing;
pub mod events;
pub mod interpolate;
pub mod keyframes;
pub mod transform;
pub mod types;

pub use clock::AnimationClock;
pub use easing::EasingFunction;
pub use events::{AnimationEvent, EventQueue};
pub use interpolate::Interpolate;
pub use keyframes::{ActiveKeyframeGroup, Keyframe, KeyframeGroup, KeyframeTrack};
pub use transform::{DecomposedTransform, Transform2D};
pub use types::{AnimationId, AnimationState};
