//! Background card animator.
//!
//! `StackAnimator` turns stack commands into keyframe groups. It holds no
//! state: every call reads the slot layout and options from the stack it is
//! given, cancels the animations it is about to replace, and schedules new
//! ones through the stack's hooks. All methods expect the stack's slot list to
//! already reflect the command (the swiped card removed, the restored card
//! inserted, the shifted order in place).
//!
//! | Command | Cancels | Cards moved | Duration |
//! |---------|---------|-------------|----------|
//! | reset | background | background, to `position + 1` | [`timing::reset_duration`] |
//! | shift | all visible | visible, from `position + distance` | [`timing::shift_duration`] |
//! | swipe | background | visible, after a delay | [`timing::swipe_duration`] |
//! | undo | background | background, from `position` | [`timing::undo_duration`] |

use deck_animation::KeyframeGroup;
use deck_config::SwipeDirection;
use log::debug;

use crate::card::{Card, CardId};
use crate::stack::{CardStack, Completion};
use crate::timing;

/// Keyframe group names, as they appear in animation events.
pub const RESET_ANIMATION: &str = "reset";
pub const SHIFT_ANIMATION: &str = "shift";
pub const SWIPE_ANIMATION: &str = "swipe";
pub const UNDO_ANIMATION: &str = "undo";

/// Stateless orchestration of background card animations.
#[derive(Debug, Clone, Copy, Default)]
pub struct StackAnimator;

impl StackAnimator {
    pub fn new() -> Self {
        Self
    }

    /// Return background cards to their resting slots after a drag is
    /// released short of a swipe. Input stays enabled while they move.
    pub fn animate_reset<S: CardStack>(&self, stack: &mut S, top_card: &Card) {
        self.remove_background_card_animations(stack);

        let duration = timing::reset_duration(stack.animation_options(), &top_card.options);
        let mut group = KeyframeGroup::new(RESET_ANIMATION)
            .duration(duration)
            .allow_user_interaction(true);
        for (position, card) in stack.background_cards().into_iter().enumerate() {
            group = add_track(stack, group, card, position + 1);
        }

        debug!("reset {} background card(s) over {:.3}s", group.tracks.len(), duration);
        stack.add_keyframes(group, None);
    }

    /// Move visible cards into the slots they occupy after the stack order
    /// rotated by `distance`.
    pub fn animate_shift<S: CardStack>(
        &self,
        stack: &mut S,
        distance: usize,
        animated: bool,
        completion: Option<Completion<S>>,
    ) {
        self.remove_all_card_animations(stack);
        let visible = stack.visible_cards();

        if !animated {
            for slot in &visible {
                let transform = stack.transform(slot.position);
                stack.set_card_transform(slot.card, transform);
            }
            complete(stack, completion);
            return;
        }

        // Start every card where it sat before the shift.
        for slot in &visible {
            let transform = stack.transform(slot.position + distance);
            stack.set_card_transform(slot.card, transform);
        }

        let duration = timing::shift_duration(stack.animation_options());
        let mut group = KeyframeGroup::new(SHIFT_ANIMATION).duration(duration);
        for slot in &visible {
            group = add_track(stack, group, slot.card, slot.position);
        }

        debug!("shift {} card(s) by {} over {:.3}s", visible.len(), distance, duration);
        stack.add_keyframes(group, completion);
    }

    /// Move the remaining visible cards up after `top_card` was swiped away.
    ///
    /// With nothing left on screen the completion is still delivered after
    /// the delay and duration the cards would have taken.
    pub fn animate_swipe<S: CardStack>(
        &self,
        stack: &mut S,
        top_card: &Card,
        direction: SwipeDirection,
        forced: bool,
        animated: bool,
        completion: Option<Completion<S>>,
    ) {
        self.remove_background_card_animations(stack);
        let visible = stack.visible_cards();

        if !animated {
            for slot in &visible {
                stack.layout_card(slot.card, slot.position);
            }
            complete(stack, completion);
            return;
        }

        let delay = timing::swipe_delay(&top_card.options, forced);
        let duration =
            timing::swipe_duration(stack.animation_options(), top_card, direction, forced);

        if visible.is_empty() {
            debug!("swipe with no cards left, completing in {:.3}s", delay + duration);
            stack.schedule_completion(delay + duration, completion);
            return;
        }

        let mut group = KeyframeGroup::new(SWIPE_ANIMATION)
            .duration(duration)
            .delay(delay);
        for slot in &visible {
            group = add_track(stack, group, slot.card, slot.position);
        }

        debug!(
            "swipe {:?} (forced: {}): {} card(s), delay {:.3}s, duration {:.3}s",
            direction,
            forced,
            visible.len(),
            delay,
            duration
        );
        stack.add_keyframes(group, completion);
    }

    /// Push background cards back one slot after `top_card` was restored.
    pub fn animate_undo<S: CardStack>(
        &self,
        stack: &mut S,
        top_card: &Card,
        animated: bool,
        completion: Option<Completion<S>>,
    ) {
        self.remove_background_card_animations(stack);
        let background = stack.background_cards();

        if !animated {
            for (position, card) in background.iter().enumerate() {
                stack.layout_card(*card, position + 1);
            }
            complete(stack, completion);
            return;
        }

        // Start every card in the slot it held before the undo.
        for (position, card) in background.iter().enumerate() {
            let transform = stack.transform(position);
            stack.set_card_transform(*card, transform);
        }

        let duration = timing::undo_duration(stack.animation_options(), &top_card.options);
        let mut group = KeyframeGroup::new(UNDO_ANIMATION).duration(duration);
        for (position, card) in background.iter().enumerate() {
            group = add_track(stack, group, *card, position + 1);
        }

        debug!("undo {} background card(s) over {:.3}s", background.len(), duration);
        stack.add_keyframes(group, completion);
    }

    /// Cancel in-flight animations on every visible card.
    pub fn remove_all_card_animations<S: CardStack>(&self, stack: &mut S) {
        for slot in stack.visible_cards() {
            stack.remove_card_animations(slot.card);
        }
    }

    /// Cancel in-flight animations on every card behind the top card.
    pub fn remove_background_card_animations<S: CardStack>(&self, stack: &mut S) {
        for card in stack.background_cards() {
            stack.remove_card_animations(card);
        }
    }
}

/// Track from `card`'s current transform to the resting transform of
/// `position`.
fn add_track<S: CardStack>(
    stack: &S,
    group: KeyframeGroup<CardId>,
    card: CardId,
    position: usize,
) -> KeyframeGroup<CardId> {
    let to = stack.transform(position);
    let from = stack.card_transform(card).unwrap_or(to);
    group.track(card, from, to)
}

fn complete<S>(stack: &mut S, completion: Option<Completion<S>>) {
    if let Some(completion) = completion {
        completion(stack, true);
    }
}
