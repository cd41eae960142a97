//! Card data sources.

use deck_config::CardAnimationOptions;

use crate::card::Card;

/// Supplies the cards a stack shows, by data index.
pub trait CardDataSource {
    fn number_of_cards(&self) -> usize;

    /// Build the card for `index`. Called each time the card enters the
    /// visible window, so every call should return a fresh card.
    fn card_for(&self, index: usize) -> Card;
}

/// Data source over a list of card contents sharing one set of options.
#[derive(Debug, Clone, Default)]
pub struct VecDataSource {
    contents: Vec<String>,
    options: CardAnimationOptions,
}

impl VecDataSource {
    pub fn new<I, T>(contents: I, options: CardAnimationOptions) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            contents: contents.into_iter().map(Into::into).collect(),
            options,
        }
    }

    pub fn contents(&self) -> &[String] {
        &self.contents
    }

    pub fn push(&mut self, content: impl Into<String>) {
        self.contents.push(content.into());
    }

    pub fn insert(&mut self, index: usize, content: impl Into<String>) {
        self.contents.insert(index, content.into());
    }

    pub fn remove(&mut self, index: usize) -> String {
        self.contents.remove(index)
    }
}

impl CardDataSource for VecDataSource {
    fn number_of_cards(&self) -> usize {
        self.contents.len()
    }

    fn card_for(&self, index: usize) -> Card {
        let content = self.contents.get(index).cloned().unwrap_or_default();
        Card::new(content).with_options(self.options.clone())
    }
}
