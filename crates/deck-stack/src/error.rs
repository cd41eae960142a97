//! Error types for stack updates.

use thiserror::Error;

/// Result type for stack operations.
pub type Result<T> = std::result::Result<T, StackError>;

/// Errors returned by [`crate::StackController`] commands.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StackError {
    /// The data source count disagrees with the update that was applied.
    #[error(
        "Invalid update: invalid number of cards. The number of cards contained in the card stack \
         after the update ({new_count}) must be equal to the number of cards contained in the card \
         stack before the update ({old_count}), plus or minus the number of cards inserted or \
         deleted ({inserted} inserted, {deleted} deleted)"
    )]
    InvalidUpdate {
        new_count: usize,
        old_count: usize,
        inserted: usize,
        deleted: usize,
    },

    /// An index or position is outside the stack.
    #[error("index {index} out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Undo was requested with no swipe history.
    #[error("no swipe to undo")]
    NothingToUndo,

    /// A swipe, undo or shift is still animating.
    #[error("card stack is animating")]
    Busy,

    /// The command needs a top card and there is none.
    #[error("card stack is empty")]
    EmptyStack,
}
