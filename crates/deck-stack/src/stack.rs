//! The stack surface the animator works against.

use deck_animation::{AnimationId, KeyframeGroup, Transform2D};
use deck_config::StackAnimationOptions;

use crate::card::CardId;

/// Completion work for an animation, run once with the owning stack and a
/// `finished` flag that is `false` when the animation was cancelled.
pub type Completion<S> = Box<dyn FnOnce(&mut S, bool)>;

/// A card on screen paired with its stack position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleCardSlot {
    pub card: CardId,
    /// Index into the data source.
    pub index: usize,
    /// 0 is the top card.
    pub position: usize,
}

/// Read access to the slot layout plus the hooks the animator uses to move
/// cards and schedule work.
///
/// Positions handed out by [`CardStack::visible_cards`] are contiguous from
/// zero. Background cards are the visible cards behind the top card, in
/// front-to-back order.
pub trait CardStack: Sized {
    /// Cards on screen, front to back.
    fn visible_cards(&self) -> Vec<VisibleCardSlot>;

    /// Visible cards excluding the top card, front to back.
    fn background_cards(&self) -> Vec<CardId> {
        self.visible_cards()
            .into_iter()
            .skip(1)
            .map(|slot| slot.card)
            .collect()
    }

    /// Stack-scope duration overrides.
    fn animation_options(&self) -> &StackAnimationOptions;

    /// Resting transform for the card at `position`.
    fn transform(&self, position: usize) -> Transform2D;

    /// Current transform of `card`, if the stack knows it.
    fn card_transform(&self, card: CardId) -> Option<Transform2D>;

    fn set_card_transform(&mut self, card: CardId, transform: Transform2D);

    /// Commit `card` to the resting transform of `position` without animating.
    fn layout_card(&mut self, card: CardId, position: usize) {
        let transform = self.transform(position);
        self.set_card_transform(card, transform);
    }

    /// Drop every in-flight animation of `card`. The card keeps its current
    /// transform. Safe to call when nothing is running.
    fn remove_card_animations(&mut self, card: CardId);

    /// Schedule a keyframe group; `completion` runs when it ends or is
    /// cancelled.
    fn add_keyframes(
        &mut self,
        group: KeyframeGroup<CardId>,
        completion: Option<Completion<Self>>,
    ) -> AnimationId;

    /// Run `completion` with `finished == true` after `after` seconds. Nothing
    /// is scheduled without a completion.
    fn schedule_completion(
        &mut self,
        after: f64,
        completion: Option<Completion<Self>>,
    ) -> Option<AnimationId>;
}
