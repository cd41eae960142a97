//! Which data indices are still in the stack and how the rest left it.

use deck_config::SwipeDirection;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StackError};

/// A card swiped off the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Swipe {
    /// Data source index of the card.
    pub index: usize,
    pub direction: SwipeDirection,
}

/// Remaining indices (front first) plus swipe history (oldest first).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackState {
    remaining_indices: Vec<usize>,
    swipes: Vec<Swipe>,
}

impl StackState {
    /// Fresh state over `count` cards in data source order.
    pub fn new(count: usize) -> Self {
        Self {
            remaining_indices: (0..count).collect(),
            swipes: Vec::new(),
        }
    }

    pub fn remaining_indices(&self) -> &[usize] {
        &self.remaining_indices
    }

    pub fn swipes(&self) -> &[Swipe] {
        &self.swipes
    }

    /// Data source index of the top card.
    pub fn top_index(&self) -> Option<usize> {
        self.remaining_indices.first().copied()
    }

    /// Cards tracked in either list.
    pub fn total_index_count(&self) -> usize {
        self.remaining_indices.len() + self.swipes.len()
    }

    /// Move the top card into the history.
    pub fn swipe(&mut self, direction: SwipeDirection) -> Result<Swipe> {
        if self.remaining_indices.is_empty() {
            return Err(StackError::EmptyStack);
        }
        let swipe = Swipe {
            index: self.remaining_indices.remove(0),
            direction,
        };
        self.swipes.push(swipe);
        Ok(swipe)
    }

    /// Put the most recently swiped card back on top.
    pub fn undo_swipe(&mut self) -> Result<Swipe> {
        let swipe = self.swipes.pop().ok_or(StackError::NothingToUndo)?;
        self.remaining_indices.insert(0, swipe.index);
        Ok(swipe)
    }

    /// Rotate the remaining cards so the card `distance` slots down becomes
    /// the top card.
    pub fn shift(&mut self, distance: usize) {
        let len = self.remaining_indices.len();
        if len > 1 {
            self.remaining_indices.rotate_left(distance % len);
        }
    }

    /// Record a card newly inserted at data `index`, placed at `position` in
    /// the remaining cards. Indices at or after `index` move down by one.
    pub fn insert(&mut self, index: usize, position: usize) -> Result<()> {
        let total = self.total_index_count();
        if index > total {
            return Err(StackError::IndexOutOfBounds { index, len: total + 1 });
        }
        if position > self.remaining_indices.len() {
            return Err(StackError::IndexOutOfBounds {
                index: position,
                len: self.remaining_indices.len() + 1,
            });
        }

        for existing in &mut self.remaining_indices {
            if *existing >= index {
                *existing += 1;
            }
        }
        for swipe in &mut self.swipes {
            if swipe.index >= index {
                swipe.index += 1;
            }
        }
        self.remaining_indices.insert(position, index);
        Ok(())
    }

    /// Forget the card at data `index`, wherever it is. Indices after it move
    /// up by one.
    pub fn delete(&mut self, index: usize) -> Result<()> {
        let total = self.total_index_count();
        if index >= total {
            return Err(StackError::IndexOutOfBounds { index, len: total });
        }

        self.remaining_indices.retain(|existing| *existing != index);
        self.swipes.retain(|swipe| swipe.index != index);
        for existing in &mut self.remaining_indices {
            if *existing > index {
                *existing -= 1;
            }
        }
        for swipe in &mut self.swipes {
            if swipe.index > index {
                swipe.index -= 1;
            }
        }
        Ok(())
    }

    /// Forget the remaining card at `position`.
    pub fn delete_at_position(&mut self, position: usize) -> Result<usize> {
        let index = *self
            .remaining_indices
            .get(position)
            .ok_or(StackError::IndexOutOfBounds {
                index: position,
                len: self.remaining_indices.len(),
            })?;
        self.delete(index)?;
        Ok(index)
    }
}
