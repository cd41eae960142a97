//! Simulated animation clock.
//!
//! The `AnimationClock` is the single place time advances. It owns every
//! scheduled keyframe group and deferred timer, and is driven by its owner
//! calling [`AnimationClock::update`] once per frame. Nothing runs between
//! updates, so scheduling and cancellation are plain synchronous calls and
//! all work happens on the owner's call stack.
//!
//! # Usage
//!
//! ```
//! use deck_animation::clock::AnimationClock;
//! use deck_animation::keyframes::KeyframeGroup;
//! use deck_animation::transform::Transform2D;
//!
//! let mut clock = AnimationClock::new();
//! let id = clock.start_group(
//!     KeyframeGroup::new("reset")
//!         .duration(0.3)
//!         .track(1_u32, Transform2D::scale_uniform(0.9), Transform2D::identity()),
//! );
//!
//! clock.update(0.15);
//! let (card, pose) = clock.samples()[0];
//! assert_eq!(card, 1);
//! assert!(pose.a > 0.9 && pose.a < 1.0);
//!
//! clock.update(0.2);
//! let ended: Vec<_> = clock.drain_events().filter(|e| e.completion().is_some()).collect();
//! assert_eq!(ended[0].animation_id(), id);
//! ```

use log::debug;
use std::collections::BTreeMap;
use std::fmt::Debug;

use super::events::{AnimationEvent, EventQueue};
use super::keyframes::{ActiveKeyframeGroup, KeyframeGroup};
use super::transform::Transform2D;
use super::types::{AnimationId, AnimationState};

/// Event name reported for a cancelled timer.
pub const TIMER_NAME: &str = "timer";

/// Owner of all in-flight keyframe groups and timers for one stack.
#[derive(Debug)]
pub struct AnimationClock<K> {
    /// Seconds elapsed since creation.
    now: f64,
    /// Running groups, iterated in scheduling order.
    groups: BTreeMap<AnimationId, ActiveKeyframeGroup<K>>,
    /// Deferred timers and their deadlines.
    timers: BTreeMap<AnimationId, f64>,
    /// Transforms sampled by the last update, oldest group first.
    samples: Vec<(K, Transform2D)>,
    /// Lifecycle events not yet drained.
    events: EventQueue,
}

impl<K> Default for AnimationClock<K> {
    fn default() -> Self {
        Self {
            now: 0.0,
            groups: BTreeMap::new(),
            timers: BTreeMap::new(),
            samples: Vec::new(),
            events: EventQueue::new(),
        }
    }
}

impl<K: Copy + PartialEq + Debug> AnimationClock<K> {
    /// Create an idle clock at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current clock time in seconds.
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Schedule a keyframe group. Groups without tracks still run their
    /// delay and duration so their completion fires on time.
    pub fn start_group(&mut self, group: KeyframeGroup<K>) -> AnimationId {
        let id = AnimationId::new();
        debug!(
            "start group {:?} '{}' ({} tracks, delay {:.3}s, duration {:.3}s)",
            id,
            group.name,
            group.tracks.len(),
            group.delay,
            group.duration
        );

        self.events.push(AnimationEvent::Started {
            animation_id: id,
            name: group.name.clone(),
        });
        self.groups.insert(id, ActiveKeyframeGroup::new(id, group));
        id
    }

    /// Schedule a timer that fires `after` seconds from now. Timers are not
    /// tied to any target and are unaffected by [`Self::remove_animations`].
    pub fn schedule_timer(&mut self, after: f64) -> AnimationId {
        let id = AnimationId::new();
        let deadline = self.now + after.max(0.0);
        debug!("schedule timer {:?} at t={:.3}s", id, deadline);
        self.timers.insert(id, deadline);
        id
    }

    /// Remove every track animating `target`. The target keeps whatever
    /// transform it was last given. A group left with no tracks is cancelled
    /// immediately; a group that still animates other targets runs on but
    /// reports `Cancelled` when it ends.
    ///
    /// Returns the number of groups that lost a track.
    pub fn remove_animations(&mut self, target: K) -> usize {
        let mut touched = 0;
        let mut emptied = Vec::new();

        for (id, active) in &mut self.groups {
            if active.remove_target(&target) {
                touched += 1;
                if active.group.tracks.is_empty() {
                    active.cancel();
                    emptied.push(*id);
                }
            }
        }

        for id in emptied {
            if let Some(active) = self.groups.remove(&id) {
                debug!("group {:?} '{}' cancelled", id, active.group.name);
                self.events.push(AnimationEvent::Cancelled {
                    animation_id: id,
                    name: active.group.name,
                });
            }
        }

        touched
    }

    /// Cancel every group and timer. Each one reports `Cancelled`, timers
    /// included, so every scheduled ID still ends exactly once.
    pub fn cancel_all(&mut self) {
        for (id, mut active) in std::mem::take(&mut self.groups) {
            active.cancel();
            self.events.push(AnimationEvent::Cancelled {
                animation_id: id,
                name: active.group.name,
            });
        }
        for id in std::mem::take(&mut self.timers).into_keys() {
            debug!("timer {:?} cancelled", id);
            self.events.push(AnimationEvent::Cancelled {
                animation_id: id,
                name: TIMER_NAME.to_string(),
            });
        }
        self.samples.clear();
    }

    /// Advance the clock by `delta` seconds.
    ///
    /// Samples every running track (including the final frame of groups that
    /// finish during this update) and queues `Ended`/`Cancelled`/`TimerFired`
    /// events. Returns `true` while anything is still scheduled.
    pub fn update(&mut self, delta: f64) -> bool {
        let delta = delta.max(0.0);
        self.now += delta;
        self.samples.clear();

        let mut finished = Vec::new();
        for (id, active) in &mut self.groups {
            let still_active = active.update(delta);

            if active.state != AnimationState::Pending {
                let progress = active.progress();
                for track in &active.group.tracks {
                    self.samples
                        .push((track.target, track.value_at(progress, active.group.easing)));
                }
            }

            if !still_active {
                finished.push(*id);
            }
        }

        for id in finished {
            if let Some(active) = self.groups.remove(&id) {
                let event = if active.interrupted {
                    AnimationEvent::Cancelled {
                        animation_id: id,
                        name: active.group.name,
                    }
                } else {
                    AnimationEvent::Ended {
                        animation_id: id,
                        name: active.group.name,
                    }
                };
                self.events.push(event);
            }
        }

        let now = self.now;
        let fired: Vec<AnimationId> = self
            .timers
            .iter()
            .filter(|(_, deadline)| now >= **deadline)
            .map(|(id, _)| *id)
            .collect();
        for id in fired {
            self.timers.remove(&id);
            self.events.push(AnimationEvent::TimerFired { animation_id: id });
        }

        self.is_busy()
    }

    /// Transforms produced by the last update, in scheduling order. When two
    /// groups animate the same target the later entry wins.
    pub fn samples(&self) -> &[(K, Transform2D)] {
        &self.samples
    }

    /// Drain queued lifecycle events.
    pub fn drain_events(&mut self) -> impl Iterator<Item = AnimationEvent> + '_ {
        self.events.drain()
    }

    /// Whether any group currently animates `target`.
    pub fn is_animating(&self, target: K) -> bool {
        self.groups.values().any(|g| g.animates(&target))
    }

    /// Whether any group or timer is still scheduled.
    pub fn is_busy(&self) -> bool {
        !self.groups.is_empty() || !self.timers.is_empty()
    }

    /// Number of timers still waiting.
    pub fn pending_timer_count(&self) -> usize {
        self.timers.len()
    }

    /// Whether `target`'s animations currently allow user interaction.
    /// Targets with no animation always do.
    pub fn allows_interaction(&self, target: K) -> bool {
        self.groups
            .values()
            .filter(|g| g.animates(&target))
            .all(|g| g.group.allows_user_interaction)
    }
}
