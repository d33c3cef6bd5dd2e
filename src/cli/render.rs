//! Plain-text rendering of boards and itineraries.

use std::fmt::Write;

use tripboard_protocol::{Board, Itinerary, List};

/// Renders the board heading followed by every list and its cards.
pub fn board(board: &Board, lists: &[List]) -> String {
    let mut out = format!(
        "{} ({}, {} days)\n",
        board.title,
        board.location,
        board.trip_days()
    );
    for list in lists {
        let _ = writeln!(out, "  {}", list.title);
        for card in &list.cards {
            let _ = writeln!(out, "    {}. {}", card.order + 1, card.title);
        }
    }
    out
}

/// Renders each section with its items.
pub fn itinerary(itinerary: &Itinerary) -> String {
    let mut out = String::new();
    for (title, items) in itinerary.sections() {
        let _ = writeln!(out, "{title}");
        for item in items {
            let _ = writeln!(out, "  - {item}");
        }
    }
    out
}
