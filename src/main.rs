use anyhow::Result;
use deck_config::{DeckConfig, SwipeDirection};
use deck_stack::{StackController, VecDataSource};

const FRAME: f64 = 1.0 / 60.0;

type Deck = StackController<VecDataSource>;

fn main() -> Result<()> {
    let _ = env_logger::try_init();

    let config = DeckConfig::load();
    log::info!(
        "deck: {} visible cards, swipe {:.2}s, min speed {}",
        config.layout.number_of_visible_cards,
        config.animation.card.total_swipe_duration,
        config.animation.card.minimum_swipe_speed
    );

    let cities = ["Lisbon", "Osaka", "Quito", "Tallinn", "Hobart", "Fez"];
    let source = VecDataSource::new(cities, config.animation.card.clone());
    let mut deck = StackController::new(source, &config);
    report(&mut deck, "start");

    deck.swipe(SwipeDirection::Right, true)?;
    run(&mut deck, "forced swipe right");

    // Slow, short drag: released without committing.
    deck.begin_drag(config.layout.card_height * 0.25)?;
    for step in 1..=10 {
        let x = -6.0 * step as f64;
        deck.update_drag((x, 2.0), (-300.0, 0.0))?;
        deck.tick(FRAME);
    }
    deck.end_drag()?;
    run(&mut deck, "cancelled drag");

    // Fast fling to the left.
    deck.begin_drag(config.layout.card_height * 0.75)?;
    for step in 1..=6 {
        let x = -25.0 * step as f64;
        deck.update_drag((x, -4.0), (-2400.0, 0.0))?;
        deck.tick(FRAME);
    }
    match deck.end_drag()? {
        Some(direction) => log::info!("fling committed {:?}", direction),
        None => log::info!("fling reset"),
    }
    run(&mut deck, "fling");

    deck.undo_last_swipe(true)?;
    run(&mut deck, "undo");

    deck.shift(2, true)?;
    run(&mut deck, "shift by 2");

    while deck.top_card().is_some() {
        deck.swipe(SwipeDirection::Left, true)?;
        run(&mut deck, "swipe left");
    }

    Ok(())
}

/// Tick until every animation has settled.
fn run(deck: &mut Deck, label: &str) {
    let mut frames = 0;
    while deck.tick(FRAME) {
        frames += 1;
    }
    log::debug!("{} settled after {} frame(s)", label, frames + 1);
    report(deck, label);
}

fn report(deck: &mut Deck, label: &str) {
    for event in deck.drain_events() {
        log::info!("{}: {:?}", label, event);
    }
    let cards: Vec<String> = deck
        .cards()
        .map(|card| format!("{} (scale {:.3})", card.content, card.transform.a))
        .collect();
    log::info!(
        "{}: top {:?}, visible [{}], swiped {}",
        label,
        deck.top_card().map(|card| card.content.as_str()),
        cards.join(", "),
        deck.state().swipes().len()
    );
}
