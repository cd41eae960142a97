#![allow(dead_code)]

use deck_animation::{AnimationId, KeyframeGroup, Transform2D};
use deck_config::{CardAnimationOptions, StackAnimationOptions, SwipeDirection};
use deck_stack::{
    AnimationScheduler, Card, CardId, CardStack, Completion, TransformProvider, VisibleCardSlot,
};
use std::collections::HashMap;

/// Provider returning a distinct translation per stack position and fixed
/// values for everything drag related.
#[derive(Debug, Clone, Default)]
pub struct MockTransformProvider {
    pub test_overlay_percentage: HashMap<SwipeDirection, f64>,
    pub test_rotation_angle: f64,
    pub test_drag_transform: Transform2D,
    pub test_swipe_transform: Transform2D,
}

impl MockTransformProvider {
    pub fn position(position: usize) -> Transform2D {
        Transform2D::translate(0.0, 10.0 * position as f64)
    }
}

impl TransformProvider for MockTransformProvider {
    fn stack_transform(&self, position: usize) -> Transform2D {
        Self::position(position)
    }

    fn overlay_percentage(&self, _card: &Card, direction: SwipeDirection) -> f64 {
        self.test_overlay_percentage
            .get(&direction)
            .copied()
            .unwrap_or(0.0)
    }

    fn rotation_angle(&self, _card: &Card) -> f64 {
        self.test_rotation_angle
    }

    fn drag_transform(&self, _card: &Card) -> Transform2D {
        self.test_drag_transform
    }

    fn swipe_transform(&self, _card: &Card, _direction: SwipeDirection, _forced: bool) -> Transform2D {
        self.test_swipe_transform
    }
}

/// What the animator asked the stack to schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledGroup {
    pub name: String,
    pub delay: f64,
    pub duration: f64,
    pub allows_user_interaction: bool,
    pub targets: Vec<CardId>,
    pub has_completion: bool,
}

/// Recording `CardStack` over plain card IDs.
pub struct MockStack {
    pub cards: Vec<CardId>,
    pub options: StackAnimationOptions,
    pub provider: MockTransformProvider,
    pub transforms: HashMap<CardId, Transform2D>,
    pub removed: Vec<CardId>,
    pub layouts: Vec<(CardId, usize)>,
    pub groups: Vec<ScheduledGroup>,
    pub timers: Vec<f64>,
    pub completions: Vec<bool>,
    scheduler: AnimationScheduler<MockStack>,
}

impl MockStack {
    /// `count` visible cards, each resting at its position.
    pub fn with_cards(count: usize) -> Self {
        let provider = MockTransformProvider::default();
        let cards: Vec<CardId> = (0..count).map(|_| CardId::new()).collect();
        let transforms = cards
            .iter()
            .enumerate()
            .map(|(position, card)| (*card, provider.stack_transform(position)))
            .collect();

        Self {
            cards,
            options: StackAnimationOptions::default(),
            provider,
            transforms,
            removed: Vec::new(),
            layouts: Vec::new(),
            groups: Vec::new(),
            timers: Vec::new(),
            completions: Vec::new(),
            scheduler: AnimationScheduler::new(),
        }
    }

    /// Completion that records its `finished` flag.
    pub fn completion() -> Option<Completion<MockStack>> {
        Some(Box::new(|stack: &mut MockStack, finished: bool| {
            stack.completions.push(finished)
        }))
    }

    pub fn transform_of(&self, card: CardId) -> Transform2D {
        self.transforms
            .get(&card)
            .copied()
            .unwrap_or_else(Transform2D::identity)
    }

    pub fn set_all(&mut self, transform: Transform2D) {
        for card in &self.cards {
            self.transforms.insert(*card, transform);
        }
    }

    pub fn tick(&mut self, delta: f64) -> bool {
        let frame = self.scheduler.advance(delta);
        for (card, transform) in frame.samples {
            self.transforms.insert(card, transform);
        }
        for (completion, finished) in frame.completions {
            completion(self, finished);
        }
        self.scheduler.is_busy()
    }

    pub fn settle(&mut self) {
        for _ in 0..1000 {
            if !self.tick(1.0 / 60.0) {
                break;
            }
        }
    }

    pub fn is_animating(&self, card: CardId) -> bool {
        self.scheduler.is_animating(card)
    }
}

impl CardStack for MockStack {
    fn visible_cards(&self) -> Vec<VisibleCardSlot> {
        self.cards
            .iter()
            .enumerate()
            .map(|(position, card)| VisibleCardSlot {
                card: *card,
                index: position,
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
        self.transforms.get(&card).copied()
    }

    fn set_card_transform(&mut self, card: CardId, transform: Transform2D) {
        self.transforms.insert(card, transform);
    }

    fn layout_card(&mut self, card: CardId, position: usize) {
        self.layouts.push((card, position));
        let transform = self.transform(position);
        self.set_card_transform(card, transform);
    }

    fn remove_card_animations(&mut self, card: CardId) {
        self.removed.push(card);
        self.scheduler.remove_animations(card);
    }

    fn add_keyframes(
        &mut self,
        group: KeyframeGroup<CardId>,
        completion: Option<Completion<Self>>,
    ) -> AnimationId {
        self.groups.push(ScheduledGroup {
            name: group.name.clone(),
            delay: group.delay,
            duration: group.duration,
            allows_user_interaction: group.allows_user_interaction,
            targets: group.tracks.iter().map(|t| t.target).collect(),
            has_completion: completion.is_some(),
        });
        self.scheduler.add_keyframes(group, completion)
    }

    fn schedule_completion(
        &mut self,
        after: f64,
        completion: Option<Completion<Self>>,
    ) -> Option<AnimationId> {
        self.timers.push(after);
        self.scheduler.schedule_completion(after, completion)
    }
}

/// Top card with the given tuning, dragged horizontally at `speed`.
pub fn top_card(total_swipe: f64, fade: f64, min_speed: f64, speed: f64) -> Card {
    let options = CardAnimationOptions {
        total_swipe_duration: total_swipe,
        relative_swipe_overlay_fade_duration: fade,
        minimum_swipe_speed: min_speed,
        ..Default::default()
    };
    let mut card = Card::new("top").with_options(options);
    card.drag.velocity = (speed, 0.0);
    card
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
