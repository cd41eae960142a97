//! Completion bookkeeping on top of [`AnimationClock`].
//!
//! The clock only knows IDs; the scheduler keeps the boxed completion for each
//! ID and hands back the ready ones after every advance. The owner runs them
//! itself once it has applied the sampled transforms, so a completion can
//! freely reborrow the owner.

use deck_animation::{AnimationClock, AnimationId, KeyframeGroup, Transform2D};
use log::debug;
use std::collections::HashMap;

use crate::card::CardId;
use crate::stack::Completion;

/// Output of one [`AnimationScheduler::advance`].
pub struct Frame<S> {
    /// Transforms to write, in application order.
    pub samples: Vec<(CardId, Transform2D)>,
    /// Completions to run, in event order, with their `finished` flag.
    pub completions: Vec<(Completion<S>, bool)>,
}

impl<S> Frame<S> {
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty() && self.completions.is_empty()
    }
}

pub struct AnimationScheduler<S> {
    clock: AnimationClock<CardId>,
    pending: HashMap<AnimationId, Completion<S>>,
}

impl<S> Default for AnimationScheduler<S> {
    fn default() -> Self {
        Self {
            clock: AnimationClock::new(),
            pending: HashMap::new(),
        }
    }
}

impl<S> std::fmt::Debug for AnimationScheduler<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationScheduler")
            .field("clock", &self.clock)
            .field("pending", &self.pending.len())
            .finish()
    }
}

impl<S> AnimationScheduler<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clock(&self) -> &AnimationClock<CardId> {
        &self.clock
    }

    pub fn add_keyframes(
        &mut self,
        group: KeyframeGroup<CardId>,
        completion: Option<Completion<S>>,
    ) -> AnimationId {
        let id = self.clock.start_group(group);
        if let Some(completion) = completion {
            self.pending.insert(id, completion);
        }
        id
    }

    pub fn schedule_completion(
        &mut self,
        after: f64,
        completion: Option<Completion<S>>,
    ) -> Option<AnimationId> {
        let completion = completion?;
        let id = self.clock.schedule_timer(after);
        self.pending.insert(id, completion);
        Some(id)
    }

    pub fn remove_animations(&mut self, card: CardId) -> usize {
        let removed = self.clock.remove_animations(card);
        if removed > 0 {
            debug!("removed {} animation(s) from card {:?}", removed, card);
        }
        removed
    }

    /// Advance time and collect what the owner must apply.
    ///
    /// Completions of groups cancelled since the last advance are delivered
    /// here too, ahead of anything that finished during this step.
    pub fn advance(&mut self, delta: f64) -> Frame<S> {
        let mut completions = self.take_cancelled();
        self.clock.update(delta);

        for event in self.clock.drain_events() {
            let Some(finished) = event.completion() else {
                continue;
            };
            if let Some(completion) = self.pending.remove(&event.animation_id()) {
                debug!(
                    "dispatch completion {:?} (finished: {})",
                    event.animation_id(),
                    finished
                );
                completions.push((completion, finished));
            }
        }

        Frame {
            samples: self.clock.samples().to_vec(),
            completions,
        }
    }

    /// Completions of groups that were cancelled but not yet delivered.
    pub fn take_cancelled(&mut self) -> Vec<(Completion<S>, bool)> {
        let mut ready = Vec::new();
        for event in self.clock.drain_events() {
            if !event.is_cancelled() {
                continue;
            }
            if let Some(completion) = self.pending.remove(&event.animation_id()) {
                ready.push((completion, false));
            }
        }
        ready
    }

    /// Cancel everything scheduled. The completions are delivered with
    /// `false` by the next [`Self::advance`] or [`Self::take_cancelled`].
    pub fn cancel_all(&mut self) {
        debug!("cancel all ({} pending completion(s))", self.pending.len());
        self.clock.cancel_all();
    }

    pub fn is_busy(&self) -> bool {
        self.clock.is_busy()
    }

    pub fn is_animating(&self, card: CardId) -> bool {
        self.clock.is_animating(card)
    }

    pub fn allows_interaction(&self, card: CardId) -> bool {
        self.clock.allows_interaction(card)
    }

    /// Number of completions not yet delivered.
    pub fn pending_completions(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Log(Vec<(&'static str, bool)>);

    fn record(name: &'static str) -> Option<Completion<Log>> {
        Some(Box::new(move |log: &mut Log, finished: bool| log.0.push((name, finished))))
    }

    fn run(frame: Frame<Log>, log: &mut Log) {
        for (completion, finished) in frame.completions {
            completion(log, finished);
        }
    }

    fn slide(card: CardId) -> KeyframeGroup<CardId> {
        KeyframeGroup::new("slide").duration(0.5).track(
            card,
            Transform2D::identity(),
            Transform2D::translate(10.0, 0.0),
        )
    }

    #[test]
    fn test_completion_runs_once_when_group_ends() {
        let mut scheduler = AnimationScheduler::new();
        let mut log = Log::default();
        let card = CardId::new();
        scheduler.add_keyframes(slide(card), record("slide"));

        let frame = scheduler.advance(0.25);
        assert_eq!(frame.samples.len(), 1);
        run(frame, &mut log);
        assert!(log.0.is_empty());

        run(scheduler.advance(0.25), &mut log);
        run(scheduler.advance(0.25), &mut log);
        assert_eq!(log.0, vec![("slide", true)]);
        assert_eq!(scheduler.pending_completions(), 0);
    }

    #[test]
    fn test_cancelled_group_reports_unfinished() {
        let mut scheduler = AnimationScheduler::new();
        let mut log = Log::default();
        let card = CardId::new();
        scheduler.add_keyframes(slide(card), record("slide"));

        assert_eq!(scheduler.remove_animations(card), 1);
        let cancelled = scheduler.take_cancelled();
        assert_eq!(cancelled.len(), 1);
        for (completion, finished) in cancelled {
            completion(&mut log, finished);
        }
        assert_eq!(log.0, vec![("slide", false)]);
    }

    #[test]
    fn test_timer_without_completion_is_not_scheduled() {
        let mut scheduler = AnimationScheduler::<Log>::new();
        assert!(scheduler.schedule_completion(0.5, None).is_none());
        assert!(!scheduler.is_busy());
    }

    #[test]
    fn test_cancel_all_delivers_pending_timer_once() {
        let mut scheduler = AnimationScheduler::new();
        let mut log = Log::default();
        let card = CardId::new();
        scheduler.add_keyframes(slide(card), record("slide"));
        scheduler.schedule_completion(0.5, record("timer"));

        scheduler.cancel_all();
        assert!(!scheduler.is_busy());
        for _ in 0..10 {
            run(scheduler.advance(0.1), &mut log);
        }
        assert_eq!(log.0, vec![("slide", false), ("timer", false)]);
        assert_eq!(scheduler.pending_completions(), 0);
    }

    #[test]
    fn test_timer_completion() {
        let mut scheduler = AnimationScheduler::new();
        let mut log = Log::default();
        scheduler.schedule_completion(0.5, record("timer"));

        run(scheduler.advance(0.4), &mut log);
        assert!(log.0.is_empty());
        run(scheduler.advance(0.1), &mut log);
        assert_eq!(log.0, vec![("timer", true)]);
    }
}
