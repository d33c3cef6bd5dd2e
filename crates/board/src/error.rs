//! Error types for board persistence.

use tripboard_protocol::{BoardId, CardId, ListId};

/// Errors returned by a [`BoardStore`](crate::BoardStore).
///
/// The display text is shown to the user as-is.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No board with this id exists.
    #[error("Board {0} not found")]
    BoardNotFound(BoardId),

    /// A command references a list that is not on the board.
    #[error("List {0} not found")]
    ListNotFound(ListId),

    /// A command references a card that is not on the board.
    #[error("Card {0} not found")]
    CardNotFound(CardId),

    /// A list was created or renamed without a title.
    #[error("List title cannot be empty")]
    EmptyTitle,

    /// A card was created without a title.
    #[error("Card title cannot be empty")]
    EmptyCardTitle,

    /// The backing store failed.
    #[error("Failed to update: {0}")]
    Backend(String),
}

/// A specialized Result type for board persistence.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_missing_item() {
        assert_eq!(
            StoreError::ListNotFound(ListId::new("day-4")).to_string(),
            "List day-4 not found"
        );
        assert_eq!(
            StoreError::Backend("connection lost".to_string()).to_string(),
            "Failed to update: connection lost"
        );
    }
}
