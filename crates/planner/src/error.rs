//! Error types for suggestion operations.
//!
//! This module defines the failures a suggestion can end in and how each is
//! presented to the user. Cancellation is deliberately absent: a stopped
//! suggestion is an outcome, not an error.

use tripboard_protocol::{Notice, ProtocolError};

/// Errors that can end a suggestion.
#[derive(Debug, thiserror::Error)]
pub enum SuggestionError {
    /// The trip is incomplete or its length is outside the accepted range.
    ///
    /// No request is sent.
    #[error("trip is not eligible for suggestions: {0}")]
    PreconditionUnmet(#[source] ProtocolError),

    /// Another suggestion is still in flight.
    #[error("a suggestion is already in progress")]
    Busy,

    /// The service answered with a non-success status or an unusable body.
    #[error("suggestion request failed{}: {reason}", format_status(*.status))]
    RequestFailed {
        /// The HTTP status, if a response was received.
        status: Option<u16>,
        /// A description of the failure.
        reason: String,
    },

    /// The request or the response stream failed in transit.
    #[error("suggestion transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The accumulated text is not a valid itinerary.
    #[error("suggestion could not be parsed: {0}")]
    ParseFailed(#[source] ProtocolError),
}

/// Formats the status for the request failure message.
fn format_status(status: Option<u16>) -> String {
    match status {
        Some(status) => format!(" with status {status}"),
        None => String::new(),
    }
}

impl SuggestionError {
    /// Returns `true` if the failure stems from user input and should be
    /// shown as a warning rather than an error.
    #[must_use]
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::PreconditionUnmet(_) | Self::Busy)
    }

    /// Returns `true` if the request never produced a usable stream or the
    /// stream broke.
    #[must_use]
    pub fn is_request_failure(&self) -> bool {
        matches!(self, Self::RequestFailed { .. } | Self::Transport(_))
    }

    /// Builds the notice shown to the user for this failure.
    #[must_use]
    pub fn notice(&self) -> Notice {
        match self {
            Self::PreconditionUnmet(ProtocolError::TripLengthOutOfRange { min, max, .. }) => {
                Notice::warning(format!(
                    "Suggestions are only available for trips of {min} to {max} days."
                ))
            }
            Self::PreconditionUnmet(_) => {
                Notice::warning("Please provide location, start date, and end date.")
            }
            Self::Busy => Notice::warning("A suggestion is already being generated."),
            Self::RequestFailed { .. } | Self::Transport(_) => {
                Notice::error("The suggestion service is currently not available.")
                    .with_title("Error requesting suggestions!")
            }
            Self::ParseFailed(_) => Notice::error("The suggested itinerary could not be read."),
        }
    }
}

/// A specialized Result type for suggestion operations.
pub type Result<T> = std::result::Result<T, SuggestionError>;
