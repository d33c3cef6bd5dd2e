//! The body posted to the suggestion service.

use serde::{Deserialize, Serialize};
use tripboard_protocol::TripWindow;

/// A request for an itinerary.
///
/// Serializes as `{"location": ..., "days": ...}`.
///
/// # Examples
///
/// ```
/// use tripboard_planner::SuggestionRequest;
///
/// let request = SuggestionRequest::new("Kyoto", 3);
/// let json = serde_json::to_string(&request).unwrap();
/// assert_eq!(json, r#"{"location":"Kyoto","days":3}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionRequest {
    /// Destination of the trip.
    pub location: String,
    /// Trip length in days.
    pub days: u32,
}

impl SuggestionRequest {
    /// Creates a new request.
    #[must_use]
    pub fn new(location: impl Into<String>, days: u32) -> Self {
        Self {
            location: location.into(),
            days,
        }
    }
}

impl From<&TripWindow> for SuggestionRequest {
    fn from(window: &TripWindow) -> Self {
        Self::new(window.location.clone(), window.days)
    }
}
