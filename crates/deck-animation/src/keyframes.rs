//! Keyframed transform animations.
//!
//! - `Keyframe`: a transform at an offset (0.0 to 1.0) in the group's timeline
//! - `KeyframeTrack`: the keyframes for one animated target
//! - `KeyframeGroup`: tracks sharing one duration, delay and easing; the unit
//!   the clock schedules and completes
//! - `ActiveKeyframeGroup`: runtime state of a scheduled group
//!
//! Every track starts from the transform its target had when the group was
//! built, so targets are resolved once, up front, and never recomputed while
//! the group runs.
//!
//! ```
//! use deck_animation::keyframes::KeyframeGroup;
//! use deck_animation::transform::Transform2D;
//!
//! let group = KeyframeGroup::new("shift")
//!     .duration(0.1)
//!     .track(7_u32, Transform2D::scale_uniform(0.95), Transform2D::identity());
//! assert_eq!(group.tracks.len(), 1);
//! ```

use serde::{Deserialize, Serialize};

use super::easing::EasingFunction;
use super::interpolate::Interpolate;
use super::transform::Transform2D;
use super::types::{AnimationId, AnimationState};

/// A transform reached at `offset` within the group's duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Position in the timeline (0.0 to 1.0).
    pub offset: f64,
    /// Transform at this offset.
    pub transform: Transform2D,
    /// Easing used when interpolating *to* this keyframe. `None` uses the
    /// group's easing.
    pub easing: Option<EasingFunction>,
}

impl Keyframe {
    /// Keyframe at `offset` (clamped to `0.0..=1.0`).
    pub fn new(offset: f64, transform: Transform2D) -> Self {
        Self {
            offset: offset.clamp(0.0, 1.0),
            transform,
            easing: None,
        }
    }

    /// Set the easing for the segment ending at this keyframe.
    pub fn with_easing(mut self, easing: EasingFunction) -> Self {
        self.easing = Some(easing);
        self
    }
}

/// Keyframes for a single animated target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyframeTrack<K> {
    /// The animated target (a card, in practice).
    pub target: K,
    /// Transform at offset 0.
    pub from: Transform2D,
    /// Keyframes sorted by offset.
    pub keyframes: Vec<Keyframe>,
}

impl<K> KeyframeTrack<K> {
    /// Track with no keyframes yet; it holds `from` until one is added.
    pub fn new(target: K, from: Transform2D) -> Self {
        Self {
            target,
            from,
            keyframes: Vec::new(),
        }
    }

    /// Add a keyframe, keeping keyframes ordered by offset.
    pub fn keyframe(mut self, keyframe: Keyframe) -> Self {
        self.keyframes.push(keyframe);
        self.keyframes.sort_by(|a, b| a.offset.total_cmp(&b.offset));
        self
    }

    /// Final transform of the track.
    pub fn end_transform(&self) -> Transform2D {
        self.keyframes.last().map_or(self.from, |kf| kf.transform)
    }

    /// Transform at `offset` using `default_easing` for segments without
    /// their own easing.
    pub fn value_at(&self, offset: f64, default_easing: EasingFunction) -> Transform2D {
        let offset = offset.clamp(0.0, 1.0);

        let mut start_offset = 0.0;
        let mut start = self.from;
        for kf in &self.keyframes {
            if offset <= kf.offset {
                let span = kf.offset - start_offset;
                let local = if span > 0.0 {
                    (offset - start_offset) / span
                } else {
                    1.0
                };
                let eased = kf.easing.unwrap_or(default_easing).evaluate(local);
                return start.interpolate(&kf.transform, eased);
            }
            start_offset = kf.offset;
            start = kf.transform;
        }

        start
    }
}

/// A set of tracks animated together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyframeGroup<K> {
    /// Name for logging.
    pub name: String,
    /// Duration in seconds.
    pub duration: f64,
    /// Delay before the first frame, in seconds.
    pub delay: f64,
    /// Easing for segments without their own.
    pub easing: EasingFunction,
    /// Whether input stays enabled on the animated targets while running.
    pub allows_user_interaction: bool,
    /// Per-target tracks.
    pub tracks: Vec<KeyframeTrack<K>>,
}

impl<K> KeyframeGroup<K> {
    /// Empty group with zero duration and no delay.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            duration: 0.0,
            delay: 0.0,
            easing: EasingFunction::Linear,
            allows_user_interaction: false,
            tracks: Vec::new(),
        }
    }

    /// Set the duration in seconds. Negative values are treated as zero.
    pub fn duration(mut self, seconds: f64) -> Self {
        self.duration = seconds.max(0.0);
        self
    }

    /// Set the delay in seconds. Negative values are treated as zero.
    pub fn delay(mut self, seconds: f64) -> Self {
        self.delay = seconds.max(0.0);
        self
    }

    /// Set the default easing.
    pub fn easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }

    /// Keep input enabled while the group runs.
    pub fn allow_user_interaction(mut self, allow: bool) -> Self {
        self.allows_user_interaction = allow;
        self
    }

    /// Add a two-point track from `from` to `to` spanning the whole group.
    pub fn track(mut self, target: K, from: Transform2D, to: Transform2D) -> Self {
        self.tracks
            .push(KeyframeTrack::new(target, from).keyframe(Keyframe::new(1.0, to)));
        self
    }

    /// Add a pre-built track.
    pub fn add_track(mut self, track: KeyframeTrack<K>) -> Self {
        self.tracks.push(track);
        self
    }

    /// Delay plus duration.
    pub fn total_time(&self) -> f64 {
        self.delay + self.duration
    }

    /// Whether the group animates nothing.
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

/// Runtime state of a scheduled group.
#[derive(Debug, Clone)]
pub struct ActiveKeyframeGroup<K> {
    /// Identifier handed out at scheduling time.
    pub id: AnimationId,
    /// The group definition.
    pub group: KeyframeGroup<K>,
    /// Seconds since scheduling, delay included.
    pub elapsed: f64,
    /// Lifecycle state.
    pub state: AnimationState,
    /// Set once any track was removed before the group finished.
    pub interrupted: bool,
}

impl<K: PartialEq> ActiveKeyframeGroup<K> {
    /// Schedule `group` under `id`.
    pub fn new(id: AnimationId, group: KeyframeGroup<K>) -> Self {
        let state = if group.delay > 0.0 {
            AnimationState::Pending
        } else {
            AnimationState::Running
        };

        Self {
            id,
            group,
            elapsed: 0.0,
            state,
            interrupted: false,
        }
    }

    /// Progress in `0.0..=1.0`, not counting the delay.
    pub fn progress(&self) -> f64 {
        if self.group.duration <= 0.0 {
            return if self.elapsed >= self.group.delay { 1.0 } else { 0.0 };
        }
        ((self.elapsed - self.group.delay).max(0.0) / self.group.duration).min(1.0)
    }

    /// Whether the group still occupies the clock.
    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Advance by `delta` seconds. Returns `true` while still active.
    pub fn update(&mut self, delta: f64) -> bool {
        if !self.is_active() {
            return false;
        }

        self.elapsed += delta.max(0.0);

        if self.elapsed < self.group.delay {
            return true;
        }
        if self.state == AnimationState::Pending {
            self.state = AnimationState::Running;
        }
        if self.elapsed >= self.group.total_time() {
            self.state = AnimationState::Finished;
            return false;
        }
        true
    }

    /// Current transform for `target`, or `None` while the group is still
    /// waiting out its delay or does not animate `target`.
    pub fn current_value(&self, target: &K) -> Option<Transform2D> {
        if self.state == AnimationState::Pending {
            return None;
        }
        let track = self.group.tracks.iter().find(|t| &t.target == target)?;
        Some(track.value_at(self.progress(), self.group.easing))
    }

    /// Drop the track for `target`. Returns whether one was removed.
    pub fn remove_target(&mut self, target: &K) -> bool {
        let before = self.group.tracks.len();
        self.group.tracks.retain(|t| &t.target != target);
        let removed = self.group.tracks.len() != before;
        if removed {
            self.interrupted = true;
        }
        removed
    }

    /// Mark as cancelled.
    pub fn cancel(&mut self) {
        if self.is_active() {
            self.state = AnimationState::Cancelled;
        }
    }

    /// Whether this group animates `target`.
    pub fn animates(&self, target: &K) -> bool {
        self.group.tracks.iter().any(|t| &t.target == target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shrink_group() -> KeyframeGroup<u32> {
        KeyframeGroup::new("shrink")
            .duration(1.0)
            .track(1, Transform2D::identity(), Transform2D::scale_uniform(0.5))
    }

    #[test]
    fn test_keyframe_offset_clamped() {
        assert_eq!(Keyframe::new(2.0, Transform2D::identity()).offset, 1.0);
        assert_eq!(Keyframe::new(-1.0, Transform2D::identity()).offset, 0.0);
    }

    #[test]
    fn test_track_value_at() {
        let track = KeyframeTrack::new(1_u32, Transform2D::translate(0.0, 0.0))
            .keyframe(Keyframe::new(1.0, Transform2D::translate(100.0, 0.0)))
            .keyframe(Keyframe::new(0.5, Transform2D::translate(20.0, 0.0)));

        assert_eq!(track.keyframes[0].offset, 0.5);
        let quarter = track.value_at(0.25, EasingFunction::Linear);
        assert!((quarter.tx - 10.0).abs() < 1e-9);
        let three_quarters = track.value_at(0.75, EasingFunction::Linear);
        assert!((three_quarters.tx - 60.0).abs() < 1e-9);
        assert_eq!(track.end_transform(), Transform2D::translate(100.0, 0.0));
    }

    #[test]
    fn test_empty_track_holds_start() {
        let track = KeyframeTrack::new(1_u32, Transform2D::scale_uniform(0.9));
        assert_eq!(
            track.value_at(0.5, EasingFunction::Linear),
            Transform2D::scale_uniform(0.9)
        );
    }

    #[test]
    fn test_group_builder_clamps_negative_times() {
        let group = KeyframeGroup::<u32>::new("g").duration(-1.0).delay(-0.5);
        assert_eq!(group.duration, 0.0);
        assert_eq!(group.delay, 0.0);
        assert!(group.is_empty());
    }

    #[test]
    fn test_active_group_lifecycle() {
        let mut active = ActiveKeyframeGroup::new(AnimationId(1), shrink_group());
        assert_eq!(active.state, AnimationState::Running);

        assert!(active.update(0.5));
        let mid = active.current_value(&1).unwrap();
        assert!((mid.a - 0.75).abs() < 1e-9);

        assert!(!active.update(0.5));
        assert_eq!(active.state, AnimationState::Finished);
        assert_eq!(active.current_value(&1), Some(Transform2D::scale_uniform(0.5)));
        assert!(!active.update(1.0));
    }

    #[test]
    fn test_active_group_with_delay() {
        let group = shrink_group().delay(0.5);
        let mut active = ActiveKeyframeGroup::new(AnimationId(2), group);
        assert_eq!(active.state, AnimationState::Pending);

        assert!(active.update(0.25));
        assert_eq!(active.current_value(&1), None);

        assert!(active.update(0.5));
        assert_eq!(active.state, AnimationState::Running);
        assert!((active.progress() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_zero_duration_finishes_on_first_update() {
        let group = KeyframeGroup::new("snap")
            .track(3_u32, Transform2D::identity(), Transform2D::translate(5.0, 5.0));
        let mut active = ActiveKeyframeGroup::new(AnimationId(3), group);
        assert!(!active.update(0.0));
        assert_eq!(active.current_value(&3), Some(Transform2D::translate(5.0, 5.0)));
    }

    #[test]
    fn test_remove_target_marks_interrupted() {
        let mut active = ActiveKeyframeGroup::new(AnimationId(4), shrink_group());
        assert!(!active.remove_target(&9));
        assert!(!active.interrupted);
        assert!(active.remove_target(&1));
        assert!(active.interrupted);
        assert!(!active.animates(&1));
    }

    #[test]
    fn test_cancel_only_affects_active() {
        let mut active = ActiveKeyframeGroup::new(AnimationId(5), shrink_group());
        active.update(2.0);
        active.cancel();
        assert_eq!(active.state, AnimationState::Finished);
    }
}
