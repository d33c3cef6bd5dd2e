//! Trip board types and structures.
//!
//! This module defines the board layout: a [`Board`] (a trip) owns ordered
//! [`List`]s (itinerary days or categories), and each list owns ordered
//! [`Card`]s (attractions or activities).

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::trip::trip_days;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an identifier from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Creates a fresh random identifier.
            #[must_use]
            pub fn new_random() -> Self {
                Self(uuid::Uuid::new_v4().simple().to_string())
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

string_id!(
    /// Unique identifier for a board.
    BoardId
);

string_id!(
    /// Unique identifier for a list.
    ListId
);

string_id!(
    /// Unique identifier for a card.
    CardId
);

/// A single attraction or activity on a list.
///
/// # Examples
///
/// ```
/// use tripboard_protocol::Card;
///
/// let card = Card::new("c1", "l1", "Fushimi Inari", 0);
/// assert_eq!(card.list_id, "l1");
/// assert_eq!(card.order, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Unique identifier for this card.
    pub id: CardId,
    /// Short title of the attraction.
    pub title: String,
    /// The list this card currently belongs to.
    pub list_id: ListId,
    /// Zero-based position within the owning list.
    pub order: u32,
}

impl Card {
    /// Creates a new card.
    #[must_use]
    pub fn new(
        id: impl Into<CardId>,
        list_id: impl Into<ListId>,
        title: impl Into<String>,
        order: u32,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            list_id: list_id.into(),
            order,
        }
    }
}

/// An itinerary day or category on a board.
///
/// A list serialized without a `cards` field deserializes with no cards.
///
/// # Examples
///
/// ```
/// use tripboard_protocol::List;
///
/// let list: List = serde_json::from_str(
///     r#"{"id":"l1","title":"Day 1","boardId":"b1","order":0}"#,
/// ).unwrap();
/// assert!(list.cards.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    /// Unique identifier for this list.
    pub id: ListId,
    /// Title of the day or category.
    pub title: String,
    /// The board this list belongs to.
    pub board_id: BoardId,
    /// Zero-based position within the board.
    pub order: u32,
    /// Cards in this list, ordered by position.
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl List {
    /// Creates a new empty list.
    ///
    /// # Examples
    ///
    /// ```
    /// use tripboard_protocol::List;
    ///
    /// let list = List::new("l1", "b1", "Day 1", 0);
    /// assert!(list.is_empty());
    /// ```
    #[must_use]
    pub fn new(
        id: impl Into<ListId>,
        board_id: impl Into<BoardId>,
        title: impl Into<String>,
        order: u32,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            board_id: board_id.into(),
            order,
            cards: Vec::new(),
        }
    }

    /// Replaces the cards of this list, returning the list.
    #[must_use]
    pub fn with_cards(mut self, cards: Vec<Card>) -> Self {
        self.cards = cards;
        self
    }

    /// Returns the number of cards in this list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Returns `true` if the list has no cards.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Returns a reference to a card by ID, if found.
    #[must_use]
    pub fn get_card(&self, id: &CardId) -> Option<&Card> {
        self.cards.iter().find(|c| &c.id == id)
    }

    /// Returns `true` if every card's `order` equals its position and every
    /// card references this list.
    ///
    /// # Examples
    ///
    /// ```
    /// use tripboard_protocol::{Card, List};
    ///
    /// let list = List::new("l1", "b1", "Day 1", 0)
    ///     .with_cards(vec![Card::new("c1", "l1", "Museum", 0)]);
    /// assert!(list.has_dense_order());
    /// ```
    #[must_use]
    pub fn has_dense_order(&self) -> bool {
        self.cards
            .iter()
            .enumerate()
            .all(|(idx, card)| card.order as usize == idx && card.list_id == self.id)
    }
}

/// A trip: the top-level container of lists.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use tripboard_protocol::Board;
///
/// let board = Board::new(
///     "b1",
///     "Spring in Kyoto",
///     "Kyoto",
///     Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap(),
///     Utc.with_ymd_and_hms(2024, 4, 4, 0, 0, 0).unwrap(),
/// );
/// assert_eq!(board.trip_days(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    /// Unique identifier for this board.
    pub id: BoardId,
    /// Title of the trip.
    pub title: String,
    /// Destination of the trip.
    pub location: String,
    /// When the trip starts.
    pub start_date: DateTime<Utc>,
    /// When the trip ends.
    pub end_date: DateTime<Utc>,
    /// Cover image reference, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Board {
    /// Creates a new board without a cover image.
    #[must_use]
    pub fn new(
        id: impl Into<BoardId>,
        title: impl Into<String>,
        location: impl Into<String>,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            location: location.into(),
            start_date,
            end_date,
            image_url: None,
        }
    }

    /// Returns the length of the trip in days.
    #[must_use]
    pub fn trip_days(&self) -> i64 {
        trip_days(self.start_date, self.end_date)
    }
}
