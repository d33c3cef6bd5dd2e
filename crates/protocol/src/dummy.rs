//! Dummy data generation for testing and demonstration.
//!
//! This module provides a sample trip board with realistic lists and cards
//! for exercising the reorder engine and the binary's demo command.
//!
//! # Examples
//!
//! ```
//! use tripboard_protocol::dummy::dummy_board;
//!
//! let (board, lists) = dummy_board();
//! assert_eq!(board.location, "Kyoto");
//! assert_eq!(lists.len(), 3);
//! ```

use chrono::{TimeZone, Utc};

use crate::board::{Board, Card, List};

/// A builder for creating lists with cards.
///
/// This is an internal helper to reduce boilerplate when creating lists
/// whose cards must reference the list and carry dense orders.
struct ListBuilder {
    id: String,
    title: String,
    cards: Vec<String>,
}

impl ListBuilder {
    /// Creates a new list builder.
    fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            cards: Vec::new(),
        }
    }

    /// Adds a card title.
    fn card(mut self, title: impl Into<String>) -> Self {
        self.cards.push(title.into());
        self
    }

    /// Builds the list at the given board position.
    fn build(self, board_id: &str, order: u32) -> List {
        let cards = self
            .cards
            .into_iter()
            .enumerate()
            .map(|(idx, title)| {
                Card::new(
                    format!("{}-c{}", self.id, idx + 1),
                    self.id.as_str(),
                    title,
                    idx as u32,
                )
            })
            .collect();
        List::new(self.id.as_str(), board_id, self.title, order).with_cards(cards)
    }
}

/// Creates a sample board and its lists.
///
/// The board describes a three-day trip to Kyoto with eight attractions
/// spread across three days.
#[must_use]
pub fn dummy_board() -> (Board, Vec<List>) {
    let board_id = "kyoto-spring";
    let board = Board::new(
        board_id,
        "Spring in Kyoto",
        "Kyoto",
        Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0)
            .single()
            .unwrap_or_default(),
        Utc.with_ymd_and_hms(2024, 4, 4, 9, 0, 0)
            .single()
            .unwrap_or_default(),
    );

    let lists = [
        ListBuilder::new("day-1", "Day 1")
            .card("Fushimi Inari Taisha")
            .card("Nishiki Market")
            .card("Gion evening walk"),
        ListBuilder::new("day-2", "Day 2")
            .card("Arashiyama Bamboo Grove")
            .card("Tenryu-ji")
            .card("Togetsukyo Bridge"),
        ListBuilder::new("day-3", "Day 3")
            .card("Kinkaku-ji")
            .card("Philosopher's Path"),
    ]
    .into_iter()
    .enumerate()
    .map(|(order, builder)| builder.build(board_id, order as u32))
    .collect();

    (board, lists)
}
