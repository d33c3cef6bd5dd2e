//! Suggested trip itineraries.
//!
//! An [`Itinerary`] maps section titles (days or categories) to an ordered
//! sequence of attraction titles. Sections keep the order in which they
//! appear in the source text.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ProtocolError, Result};

/// A suggested itinerary: section title to ordered attraction titles.
///
/// # Examples
///
/// ```
/// use tripboard_protocol::Itinerary;
///
/// let itinerary = Itinerary::parse(r#"{"Day 1": ["Museum", "Market"]}"#).unwrap();
/// assert_eq!(itinerary.get("Day 1"), Some(&["Museum".to_string(), "Market".to_string()][..]));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Itinerary(IndexMap<String, Vec<String>>);

impl Itinerary {
    /// Parses and validates itinerary text.
    ///
    /// The text must be a JSON object whose values are arrays of strings.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::InvalidItinerary`] if the text is not valid
    /// JSON or does not have that shape.
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text.trim()).map_err(ProtocolError::InvalidItinerary)
    }

    /// Returns the number of sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no sections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the attractions of a section, if present.
    #[must_use]
    pub fn get(&self, title: &str) -> Option<&[String]> {
        self.0.get(title).map(Vec::as_slice)
    }

    /// Iterates over sections in order.
    pub fn sections(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(title, items)| (title.as_str(), items.as_slice()))
    }

    /// Converts the itinerary into list drafts, one per section.
    #[must_use]
    pub fn to_list_drafts(&self) -> Vec<ListDraft> {
        self.sections()
            .map(|(title, items)| ListDraft {
                title: title.to_string(),
                card_titles: items.to_vec(),
            })
            .collect()
    }
}

impl FromIterator<(String, Vec<String>)> for Itinerary {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A list to create on a board, with one card per title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDraft {
    /// Title of the new list.
    pub title: String,
    /// Titles of the cards to create, in order.
    pub card_titles: Vec<String>,
}
