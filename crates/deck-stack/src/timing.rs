//! Duration and delay policy for background card animations.
//!
//! Every duration is either an explicit stack-scope override or a value
//! derived from the top card's options. Results are in seconds and never
//! negative.

use deck_config::{CardAnimationOptions, StackAnimationOptions, SwipeDirection};

use crate::card::Card;

/// `explicit` when present, else `derived()`, floored at zero.
pub fn resolve(explicit: Option<f64>, derived: impl FnOnce() -> f64) -> f64 {
    non_negative(explicit.unwrap_or_else(derived))
}

/// Background cards returning after a cancelled drag.
pub fn reset_duration(stack: &StackAnimationOptions, top_card: &CardAnimationOptions) -> f64 {
    resolve(stack.reset_duration, || top_card.total_reset_duration / 2.0)
}

/// Visible cards sliding after a shift. Always explicit.
pub fn shift_duration(stack: &StackAnimationOptions) -> f64 {
    non_negative(stack.shift_duration)
}

/// Background cards moving back after an undo.
pub fn undo_duration(stack: &StackAnimationOptions, top_card: &CardAnimationOptions) -> f64 {
    resolve(stack.undo_duration, || {
        top_card.total_reverse_swipe_duration / 2.0
    })
}

/// Wait before background cards follow a swipe. Forced swipes let the
/// overlay fade in first; gestures start immediately.
pub fn swipe_delay(top_card: &CardAnimationOptions, forced: bool) -> f64 {
    if !forced {
        return 0.0;
    }
    non_negative(top_card.total_swipe_duration * top_card.overlay_fade_fraction())
}

/// Ratio of the observed drag speed to the minimum swipe speed.
pub fn velocity_factor(top_card: &Card, direction: SwipeDirection) -> f64 {
    top_card.drag_speed(direction) / top_card.minimum_swipe_speed(direction)
}

/// Background cards catching up after a swipe.
pub fn swipe_duration(
    stack: &StackAnimationOptions,
    top_card: &Card,
    direction: SwipeDirection,
    forced: bool,
) -> f64 {
    resolve(stack.swipe_duration, || {
        let half = top_card.options.total_swipe_duration / 2.0;
        if forced {
            return half;
        }
        let factor = velocity_factor(top_card, direction);
        // NaN (zero speed over zero minimum) counts as too slow.
        if !(factor >= 1.0) {
            return half;
        }
        1.0 / (2.0 * factor)
    })
}

fn non_negative(seconds: f64) -> f64 {
    if seconds > 0.0 { seconds } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(total_swipe: f64, fade: f64, min_speed: f64, speed: f64) -> Card {
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

    #[test]
    fn test_resolve_prefers_override() {
        assert_eq!(resolve(Some(0.3), || 9.0), 0.3);
        assert_eq!(resolve(None, || 0.4), 0.4);
        assert_eq!(resolve(Some(-1.0), || 0.4), 0.0);
        assert_eq!(resolve(None, || f64::NAN), 0.0);
    }

    #[test]
    fn test_reset_and_undo_derive_from_card() {
        let stack = StackAnimationOptions::default();
        let options = CardAnimationOptions::default();
        assert_eq!(reset_duration(&stack, &options), 0.3);
        assert_eq!(undo_duration(&stack, &options), 0.125);

        let stack = StackAnimationOptions {
            reset_duration: Some(1.0),
            undo_duration: Some(2.0),
            ..Default::default()
        };
        assert_eq!(reset_duration(&stack, &options), 1.0);
        assert_eq!(undo_duration(&stack, &options), 2.0);
    }

    #[test]
    fn test_shift_duration_is_explicit() {
        let stack = StackAnimationOptions {
            shift_duration: 0.35,
            ..Default::default()
        };
        assert_eq!(shift_duration(&stack), 0.35);
    }

    #[test]
    fn test_gesture_swipe_scales_with_velocity() {
        let stack = StackAnimationOptions::default();
        let top = card(1.0, 0.2, 100.0, 200.0);
        assert_eq!(velocity_factor(&top, SwipeDirection::Right), 2.0);
        assert_eq!(swipe_duration(&stack, &top, SwipeDirection::Right, false), 0.25);
        assert_eq!(swipe_delay(&top.options, false), 0.0);
    }

    #[test]
    fn test_forced_swipe_waits_for_overlay() {
        let stack = StackAnimationOptions::default();
        let top = card(1.0, 0.2, 100.0, 200.0);
        assert_eq!(swipe_duration(&stack, &top, SwipeDirection::Right, true), 0.5);
        assert_eq!(swipe_delay(&top.options, true), 0.2);
    }

    #[test]
    fn test_slow_swipe_uses_half_total() {
        let stack = StackAnimationOptions::default();
        let top = card(0.7, 0.15, 1100.0, 500.0);
        assert_eq!(swipe_duration(&stack, &top, SwipeDirection::Left, false), 0.35);
    }

    #[test]
    fn test_faster_swipe_is_shorter() {
        let stack = StackAnimationOptions::default();
        let mut previous = f64::INFINITY;
        for speed in [100.0, 150.0, 300.0, 1000.0] {
            let duration =
                swipe_duration(&stack, &card(1.0, 0.0, 100.0, speed), SwipeDirection::Right, false);
            assert!(duration < previous);
            previous = duration;
        }
    }

    #[test]
    fn test_boundary_is_continuous_for_unit_total() {
        let stack = StackAnimationOptions::default();
        let at = swipe_duration(&stack, &card(1.0, 0.0, 100.0, 100.0), SwipeDirection::Right, false);
        let below =
            swipe_duration(&stack, &card(1.0, 0.0, 100.0, 99.999), SwipeDirection::Right, false);
        assert_eq!(at, 0.5);
        assert_eq!(below, 0.5);
    }

    #[test]
    fn test_zero_minimum_speed() {
        let stack = StackAnimationOptions::default();
        let still = card(0.8, 0.0, 0.0, 0.0);
        assert_eq!(swipe_duration(&stack, &still, SwipeDirection::Right, false), 0.4);

        let moving = card(0.8, 0.0, 0.0, 50.0);
        assert_eq!(swipe_duration(&stack, &moving, SwipeDirection::Right, false), 0.0);
    }

    #[test]
    fn test_stack_override_wins() {
        let stack = StackAnimationOptions {
            swipe_duration: Some(0.9),
            ..Default::default()
        };
        let top = card(1.0, 0.2, 100.0, 200.0);
        assert_eq!(swipe_duration(&stack, &top, SwipeDirection::Right, true), 0.9);
        assert_eq!(swipe_duration(&stack, &top, SwipeDirection::Right, false), 0.9);
    }
}
