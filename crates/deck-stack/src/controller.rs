//! Card stack controller.
//!
//! `StackController` owns everything the animator reads: the data source, the
//! remaining/swiped state, the window of visible cards and the animation
//! scheduler. Commands update the state first, then hand the new layout to
//! [`StackAnimator`], which schedules background card motion. The swiped top
//! card's own fly-out and return are scheduled here.
//!
//! Time only moves in [`StackController::tick`]:
//!
//! ```
//! use deck_config::{DeckConfig, SwipeDirection};
//! use deck_stack::{StackController, VecDataSource};
//!
//! let config = DeckConfig::default();
//! let source = VecDataSource::new(["a", "b", "c"], config.animation.card.clone());
//! let mut stack = StackController::new(source, &config);
//!
//! stack.swipe(SwipeDirection::Left, true).unwrap();
//! assert!(stack.is_animating());
//! while stack.tick(1.0 / 60.0) {}
//! assert!(!stack.is_animating());
//! assert_eq!(stack.top_card().map(|c| c.content.as_str()), Some("b"));
//! ```

use deck_animation::{AnimationId, EasingFunction, KeyframeGroup, Transform2D};
use deck_config::{DeckConfig, LayoutConfig, StackAnimationOptions, SwipeDirection};
use log::{debug, warn};
use std::collections::VecDeque;

use crate::animator::StackAnimator;
use crate::card::{Card, CardId, DragState};
use crate::error::{Result, StackError};
use crate::events::StackEvent;
use crate::provider::{DefaultTransformProvider, TransformProvider};
use crate::scheduler::AnimationScheduler;
use crate::source::CardDataSource;
use crate::stack::{CardStack, Completion, VisibleCardSlot};
use crate::state::{StackState, Swipe};
use crate::timing;

/// Name of the top card's fly-out group.
pub const FLY_OUT_ANIMATION: &str = "fly-out";
/// Name of the restored top card's return group.
pub const REVERSE_SWIPE_ANIMATION: &str = "reverse-swipe";
/// Name of the dragged top card's return group.
pub const RESET_TOP_ANIMATION: &str = "reset-top";

#[derive(Debug, Clone)]
struct StackCard {
    card: Card,
    /// Data source index.
    index: usize,
}

pub struct StackController<D: CardDataSource + 'static> {
    source: D,
    provider: Box<dyn TransformProvider>,
    animator: StackAnimator,
    options: StackAnimationOptions,
    layout: LayoutConfig,
    state: StackState,
    visible: Vec<StackCard>,
    /// Swiped top cards still flying off screen.
    swiped: Vec<StackCard>,
    scheduler: AnimationScheduler<Self>,
    events: VecDeque<StackEvent>,
    /// Token of the command whose background animation is running.
    in_flight: Option<u64>,
    next_command: u64,
}

impl<D: CardDataSource + 'static> StackController<D> {
    /// Controller laid out by [`DefaultTransformProvider`].
    pub fn new(source: D, config: &DeckConfig) -> Self {
        let provider = DefaultTransformProvider::new(config.layout.clone());
        Self::with_provider(source, config, Box::new(provider))
    }

    pub fn with_provider(source: D, config: &DeckConfig, provider: Box<dyn TransformProvider>) -> Self {
        let mut controller = Self {
            source,
            provider,
            animator: StackAnimator::new(),
            options: config.animation.stack.clone(),
            layout: config.layout.clone(),
            state: StackState::default(),
            visible: Vec::new(),
            swiped: Vec::new(),
            scheduler: AnimationScheduler::new(),
            events: VecDeque::new(),
            in_flight: None,
            next_command: 0,
        };
        controller.reload_data();
        controller
    }

    pub fn source(&self) -> &D {
        &self.source
    }

    /// Mutable data source. Follow any change to its card count with the
    /// matching insert or delete call.
    pub fn source_mut(&mut self) -> &mut D {
        &mut self.source
    }

    pub fn state(&self) -> &StackState {
        &self.state
    }

    pub fn top_card(&self) -> Option<&Card> {
        self.visible.first().map(|v| &v.card)
    }

    /// Data source index of the top card.
    pub fn top_card_index(&self) -> Option<usize> {
        self.visible.first().map(|v| v.index)
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.visible
            .iter()
            .chain(self.swiped.iter())
            .map(|v| &v.card)
            .find(|card| card.id == id)
    }

    /// Visible cards, front to back.
    pub fn cards(&self) -> impl Iterator<Item = &Card> + '_ {
        self.visible.iter().map(|v| &v.card)
    }

    /// Cards swiped away whose fly-out is still running.
    pub fn swiped_cards(&self) -> impl Iterator<Item = &Card> + '_ {
        self.swiped.iter().map(|v| &v.card)
    }

    /// Whether a swipe, undo or shift is still moving cards.
    pub fn is_animating(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Whether commands are currently accepted.
    pub fn is_enabled(&self) -> bool {
        !self.is_animating()
    }

    pub fn drain_events(&mut self) -> impl Iterator<Item = StackEvent> + '_ {
        self.events.drain(..)
    }

    /// Advance the animation clock by `delta` seconds, writing sampled
    /// transforms and then running completions. Returns `true` while anything
    /// is still scheduled.
    pub fn tick(&mut self, delta: f64) -> bool {
        let frame = self.scheduler.advance(delta);
        for (card, transform) in frame.samples {
            self.set_card_transform(card, transform);
        }
        for (completion, finished) in frame.completions {
            completion(self, finished);
        }
        self.scheduler.is_busy()
    }

    /// Discard all cards and rebuild the stack from the data source.
    pub fn reload_data(&mut self) {
        let animator = self.animator;
        animator.remove_all_card_animations(self);
        self.scheduler.cancel_all();
        self.swiped.clear();
        self.state = StackState::new(self.source.number_of_cards());
        self.in_flight = None;
        self.reload_visible_cards(false);
        debug!("reloaded {} card(s)", self.state.remaining_indices().len());
    }

    /// Programmatically swipe the top card.
    pub fn swipe(&mut self, direction: SwipeDirection, animated: bool) -> Result<Swipe> {
        self.ensure_enabled()?;
        self.swipe_action(direction, true, animated)
    }

    /// Start dragging the top card, grabbed `touch_y` points from its top edge.
    pub fn begin_drag(&mut self, touch_y: f64) -> Result<()> {
        self.ensure_enabled()?;
        let top = self.visible.first_mut().ok_or(StackError::EmptyStack)?;
        if !self.scheduler.allows_interaction(top.card.id) {
            warn!("top card is animating, drag ignored");
            return Err(StackError::Busy);
        }
        top.card.drag = DragState::began_at(touch_y, self.layout.card_height);
        let id = top.card.id;

        self.scheduler.remove_animations(id);
        let animator = self.animator;
        animator.remove_background_card_animations(self);
        Ok(())
    }

    /// Follow the finger: the top card tracks the drag and background cards
    /// move toward the next slot up.
    pub fn update_drag(&mut self, translation: (f64, f64), velocity: (f64, f64)) -> Result<()> {
        let top = self.visible.first_mut().ok_or(StackError::EmptyStack)?;
        top.card.drag.translation = translation;
        top.card.drag.velocity = velocity;
        top.card.transform = self.provider.drag_transform(&top.card);

        let (top, background) = self.visible.split_at_mut(1);
        for (position, entry) in background.iter_mut().enumerate() {
            entry.card.transform = self
                .provider
                .background_drag_transform(&top[0].card, position + 1);
        }
        Ok(())
    }

    /// Release the drag. Swipes when the card was dragged far or fast enough
    /// toward an allowed direction, otherwise resets.
    pub fn end_drag(&mut self) -> Result<Option<SwipeDirection>> {
        let top = &self.visible.first().ok_or(StackError::EmptyStack)?.card;
        let committed = self
            .layout
            .swipe_directions
            .iter()
            .map(|direction| (*direction, self.provider.overlay_percentage(top, *direction)))
            .filter(|(_, percentage)| *percentage > 0.0)
            .max_by(|a, b| a.1.total_cmp(&b.1));

        match committed {
            Some((direction, percentage))
                if percentage >= 1.0
                    || top.drag_speed(direction) >= top.minimum_swipe_speed(direction) =>
            {
                if self.in_flight.is_some() {
                    warn!("drag released while stack is animating, resetting");
                    self.cancel_drag()?;
                    return Ok(None);
                }
                self.swipe_action(direction, false, true)?;
                Ok(Some(direction))
            }
            _ => {
                self.cancel_drag()?;
                Ok(None)
            }
        }
    }

    /// Return the dragged top card and the background cards to rest.
    pub fn cancel_drag(&mut self) -> Result<()> {
        let top = self.visible.first_mut().ok_or(StackError::EmptyStack)?;
        let snapshot = top.card.clone();
        top.card.reset_drag();

        let group = KeyframeGroup::new(RESET_TOP_ANIMATION)
            .duration(snapshot.options.total_reset_duration)
            .easing(EasingFunction::EaseOut)
            .allow_user_interaction(true)
            .track(snapshot.id, snapshot.transform, self.provider.stack_transform(0));
        self.scheduler.remove_animations(snapshot.id);
        self.scheduler.add_keyframes(group, None);

        let animator = self.animator;
        animator.animate_reset(self, &snapshot);
        Ok(())
    }

    /// Bring back the most recently swiped card.
    pub fn undo_last_swipe(&mut self, animated: bool) -> Result<Swipe> {
        self.ensure_enabled()?;
        let swipe = self.state.undo_swipe()?;

        if let Some(i) = self.swiped.iter().position(|s| s.index == swipe.index) {
            let flying = self.swiped.remove(i);
            self.scheduler.remove_animations(flying.card.id);
        }
        self.reload_visible_cards(true);
        self.events.push_back(StackEvent::DidUndo {
            index: swipe.index,
            direction: swipe.direction,
        });

        let Some(top) = self.visible.first().map(|v| v.card.clone()) else {
            return Ok(swipe);
        };
        if animated {
            let from = self.provider.swipe_transform(&top, swipe.direction, true);
            let group = KeyframeGroup::new(REVERSE_SWIPE_ANIMATION)
                .duration(top.options.total_reverse_swipe_duration)
                .easing(EasingFunction::EaseOut)
                .track(top.id, from, self.provider.stack_transform(0));
            self.set_card_transform(top.id, from);
            self.scheduler.add_keyframes(group, None);
        } else {
            self.layout_card(top.id, 0);
        }

        debug!("undo swipe of card {} ({:?})", swipe.index, swipe.direction);
        let completion = self.begin_command();
        let animator = self.animator;
        animator.animate_undo(self, &top, animated, Some(completion));
        Ok(swipe)
    }

    /// Rotate the remaining cards so the card `distance` slots down comes to
    /// the top. Does nothing with fewer than two visible cards.
    pub fn shift(&mut self, distance: usize, animated: bool) -> Result<()> {
        self.ensure_enabled()?;
        let remaining = self.state.remaining_indices().len();
        if self.visible.len() <= 1 || distance % remaining == 0 {
            return Ok(());
        }
        let distance = distance % remaining;

        self.state.shift(distance);
        self.reload_visible_cards(true);
        self.events.push_back(StackEvent::DidShift { distance });

        debug!("shift by {}", distance);
        let completion = self.begin_command();
        let animator = self.animator;
        animator.animate_shift(self, distance, animated, Some(completion));
        Ok(())
    }

    /// The data source gained a card at `index`; show it at `position` among
    /// the remaining cards.
    pub fn insert_card(&mut self, index: usize, position: usize) -> Result<()> {
        self.check_update(1, 0)?;
        self.state.insert(index, position)?;
        self.renumber_swiped_after_insert(index);
        self.reload_visible_cards(false);
        Ok(())
    }

    /// The data source gained cards at `indices`; append them to the bottom
    /// of the stack in order.
    pub fn append_cards(&mut self, indices: &[usize]) -> Result<()> {
        self.check_update(indices.len(), 0)?;
        let mut next = self.state.clone();
        for index in indices {
            let end = next.remaining_indices().len();
            next.insert(*index, end)?;
        }
        self.state = next;
        for index in indices {
            self.renumber_swiped_after_insert(*index);
        }
        self.reload_visible_cards(false);
        Ok(())
    }

    /// The data source lost the cards at `indices`. Repeated indices count
    /// once.
    pub fn delete_cards(&mut self, indices: &[usize]) -> Result<()> {
        let sorted = descending_unique(indices);
        self.check_update(0, sorted.len())?;

        let mut next = self.state.clone();
        for index in &sorted {
            next.delete(*index)?;
        }
        self.commit_deletions(next, &sorted);
        Ok(())
    }

    /// The data source lost the remaining cards at stack `positions`.
    /// Repeated positions count once.
    pub fn delete_cards_at_positions(&mut self, positions: &[usize]) -> Result<()> {
        let sorted = descending_unique(positions);
        self.check_update(0, sorted.len())?;

        // Back to front, so earlier deletions leave later positions in place.
        let mut next = self.state.clone();
        let deleted = sorted
            .iter()
            .map(|position| next.delete_at_position(*position))
            .collect::<Result<Vec<_>>>()?;
        self.commit_deletions(next, &deleted);
        Ok(())
    }

    fn swipe_action(&mut self, direction: SwipeDirection, forced: bool, animated: bool) -> Result<Swipe> {
        if self.visible.is_empty() {
            return Err(StackError::EmptyStack);
        }
        let swipe = self.state.swipe(direction)?;
        let top = self.visible.remove(0);

        let position = self.visible.len();
        if position < self.layout.number_of_visible_cards {
            if let Some(index) = self.state.remaining_indices().get(position).copied() {
                let mut card = self.source.card_for(index);
                card.transform = self.provider.stack_transform(position);
                self.visible.push(StackCard { card, index });
            }
        }

        self.scheduler.remove_animations(top.card.id);
        let snapshot = top.card.clone();
        if animated {
            self.fly_out(&top, direction, forced);
        }

        self.events.push_back(StackEvent::DidSwipe {
            index: swipe.index,
            direction,
        });
        if self.state.remaining_indices().is_empty() {
            self.events.push_back(StackEvent::DidSwipeAllCards);
        }

        debug!("swipe card {} {:?} (forced: {})", swipe.index, direction, forced);
        let completion = self.begin_command();
        let animator = self.animator;
        animator.animate_swipe(self, &snapshot, direction, forced, animated, Some(completion));
        Ok(swipe)
    }

    /// Send the swiped top card off screen and forget it once it is gone.
    fn fly_out(&mut self, top: &StackCard, direction: SwipeDirection, forced: bool) {
        let options = &top.card.options;
        let delay = timing::swipe_delay(options, forced);
        let duration = (options.total_swipe_duration - delay).max(0.0);
        let to = self.provider.swipe_transform(&top.card, direction, forced);
        let id = top.card.id;

        let group = KeyframeGroup::new(FLY_OUT_ANIMATION)
            .duration(duration)
            .delay(delay)
            .easing(EasingFunction::EaseIn)
            .track(id, top.card.transform, to);
        let forget: Completion<Self> = Box::new(move |stack: &mut Self, _finished: bool| {
            stack.swiped.retain(|s| s.card.id != id);
        });

        self.swiped.push(top.clone());
        self.scheduler.add_keyframes(group, Some(forget));
    }

    /// Rebuild the visible window from the remaining indices. With `reuse`,
    /// cards whose index stays in the window keep their identity and pose.
    fn reload_visible_cards(&mut self, reuse: bool) {
        let mut previous = std::mem::take(&mut self.visible);
        let window: Vec<usize> = self
            .state
            .remaining_indices()
            .iter()
            .take(self.layout.number_of_visible_cards)
            .copied()
            .collect();

        for (position, index) in window.into_iter().enumerate() {
            let kept = if reuse {
                previous
                    .iter()
                    .position(|v| v.index == index)
                    .map(|i| previous.swap_remove(i))
            } else {
                None
            };
            let entry = kept.unwrap_or_else(|| {
                let mut card = self.source.card_for(index);
                card.transform = self.provider.stack_transform(position);
                StackCard { card, index }
            });
            self.visible.push(entry);
        }

        for dropped in previous {
            self.scheduler.remove_animations(dropped.card.id);
        }
    }

    /// Keep flying-out cards pointing at the same data after an insert.
    fn renumber_swiped_after_insert(&mut self, index: usize) {
        for swiped in &mut self.swiped {
            if swiped.index >= index {
                swiped.index += 1;
            }
        }
    }

    /// Install `state` after `deleted` were removed from it, in that order.
    /// Flying-out cards whose data is gone are dropped.
    fn commit_deletions(&mut self, state: StackState, deleted: &[usize]) {
        self.state = state;
        for index in deleted {
            let (gone, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.swiped)
                .into_iter()
                .partition(|swiped| swiped.index == *index);
            for swiped in gone {
                self.scheduler.remove_animations(swiped.card.id);
            }
            self.swiped = kept;
            for swiped in &mut self.swiped {
                if swiped.index > *index {
                    swiped.index -= 1;
                }
            }
        }
        self.reload_visible_cards(false);
    }

    fn ensure_enabled(&self) -> Result<()> {
        if self.is_animating() {
            warn!("command ignored while the stack is animating");
            return Err(StackError::Busy);
        }
        Ok(())
    }

    fn check_update(&self, inserted: usize, deleted: usize) -> Result<()> {
        let old_count = self.state.total_index_count();
        let new_count = self.source.number_of_cards();
        if old_count + inserted != new_count + deleted {
            return Err(StackError::InvalidUpdate {
                new_count,
                old_count,
                inserted,
                deleted,
            });
        }
        Ok(())
    }

    /// Mark a command in flight; the returned completion clears it.
    fn begin_command(&mut self) -> Completion<Self> {
        self.next_command += 1;
        let token = self.next_command;
        self.in_flight = Some(token);
        Box::new(move |stack: &mut Self, finished: bool| {
            if stack.in_flight == Some(token) {
                stack.in_flight = None;
            }
            debug!("command {} done (finished: {})", token, finished);
        })
    }
}

fn descending_unique(values: &[usize]) -> Vec<usize> {
    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    sorted.dedup();
    sorted
}

impl<D: CardDataSource + 'static> CardStack for StackController<D> {
    fn visible_cards(&self) -> Vec<VisibleCardSlot> {
        self.visible
            .iter()
            .enumerate()
            .map(|(position, v)| VisibleCardSlot {
                card: v.card.id,
                index: v.index,
                position,
            })
            .collect()
    }

    fn animation_options(&self) -> &StackAnimationOptions {
        &self.options
    }

    fn transform(&self, position: usize) -> Transform2D {
        self.provider.stack_transform(position)
    }

    fn card_transform(&self, card: CardId) -> Option<Transform2D> {
        self.card(card).map(|c| c.transform)
    }

    fn set_card_transform(&mut self, card: CardId, transform: Transform2D) {
        if let Some(entry) = self
            .visible
            .iter_mut()
            .chain(self.swiped.iter_mut())
            .find(|v| v.card.id == card)
        {
            entry.card.transform = transform;
        }
    }

    fn remove_card_animations(&mut self, card: CardId) {
        self.scheduler.remove_animations(card);
    }

    fn add_keyframes(
        &mut self,
        group: KeyframeGroup<CardId>,
        completion: Option<Completion<Self>>,
    ) -> AnimationId {
        self.scheduler.add_keyframes(group, completion)
    }

    fn schedule_completion(
        &mut self,
        after: f64,
        completion: Option<Completion<Self>>,
    ) -> Option<AnimationId> {
        self.scheduler.schedule_completion(after, completion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::VecDataSource;

    fn controller(count: usize) -> StackController<VecDataSource> {
        let config = DeckConfig::default();
        let contents: Vec<String> = (0..count).map(|i| format!("card {i}")).collect();
        StackController::new(VecDataSource::new(contents, config.animation.card.clone()), &config)
    }

    fn settle(stack: &mut StackController<VecDataSource>) {
        for _ in 0..600 {
            if !stack.tick(1.0 / 60.0) {
                break;
            }
        }
    }

    #[test]
    fn test_initial_window() {
        let stack = controller(5);
        let slots = stack.visible_cards();
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].index, 0);
        assert_eq!(slots[1].position, 1);
        assert_eq!(stack.cards().nth(1).unwrap().transform, Transform2D::scale_uniform(0.95));
    }

    #[test]
    fn test_commands_rejected_while_animating() {
        let mut stack = controller(4);
        stack.swipe(SwipeDirection::Right, true).unwrap();
        assert_eq!(stack.swipe(SwipeDirection::Right, true), Err(StackError::Busy));
        assert_eq!(stack.undo_last_swipe(true), Err(StackError::Busy));
        settle(&mut stack);
        assert!(stack.is_enabled());
    }

    #[test]
    fn test_unanimated_swipe_completes_immediately() {
        let mut stack = controller(3);
        let swipe = stack.swipe(SwipeDirection::Left, false).unwrap();
        assert_eq!(swipe.index, 0);
        assert!(!stack.is_animating());
        assert_eq!(stack.swiped_cards().count(), 0);
        assert_eq!(stack.top_card_index(), Some(1));
        assert_eq!(stack.top_card().unwrap().transform, Transform2D::identity());
    }

    #[test]
    fn test_fly_out_card_is_dropped_after_animation() {
        let mut stack = controller(3);
        stack.swipe(SwipeDirection::Left, true).unwrap();
        assert_eq!(stack.swiped_cards().count(), 1);
        settle(&mut stack);
        assert_eq!(stack.swiped_cards().count(), 0);
    }

    #[test]
    fn test_shift_noop_with_single_card() {
        let mut stack = controller(1);
        stack.shift(1, true).unwrap();
        assert!(!stack.is_animating());
        assert!(stack.drain_events().next().is_none());
    }

    #[test]
    fn test_reload_cancels_deferred_completion() {
        let mut stack = controller(1);
        stack.swipe(SwipeDirection::Left, true).unwrap();
        assert_eq!(stack.scheduler.pending_completions(), 2);

        stack.reload_data();
        assert!(!stack.tick(0.0));
        assert_eq!(stack.scheduler.pending_completions(), 0);
        assert!(stack.is_enabled());
        assert_eq!(stack.top_card_index(), Some(0));
    }

    #[test]
    fn test_deleted_swiped_card_cannot_be_undone() {
        let mut stack = controller(3);
        stack.swipe(SwipeDirection::Left, true).unwrap();
        stack.tick(0.5);
        assert!(stack.is_enabled());
        assert_eq!(stack.swiped_cards().count(), 1);

        stack.source_mut().remove(0);
        stack.delete_cards(&[0]).unwrap();
        assert_eq!(stack.swiped_cards().count(), 0);
        assert_eq!(stack.state().remaining_indices(), &[0, 1]);
        assert_eq!(stack.undo_last_swipe(false), Err(StackError::NothingToUndo));
    }

    #[test]
    fn test_check_update_counts() {
        let mut stack = controller(3);
        stack.source_mut().push("extra");
        assert!(matches!(
            stack.delete_cards(&[0]),
            Err(StackError::InvalidUpdate { new_count: 4, old_count: 3, inserted: 0, deleted: 1 })
        ));
        stack.append_cards(&[3]).unwrap();
        assert_eq!(stack.state().remaining_indices(), &[0, 1, 2, 3]);
    }
}
