//! Error types for the tripboard-protocol crate.
//!
//! This module defines all error types that can occur when working with
//! protocol types, including trip validation and itinerary parsing failures.

use thiserror::Error;

/// Errors that can occur during protocol operations.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// A required trip field was missing or blank.
    #[error("missing trip field: {0}")]
    MissingTripField(&'static str),

    /// The trip length is outside the accepted range.
    #[error("trip length of {days} days is outside the accepted range of {min} to {max} days")]
    TripLengthOutOfRange {
        /// The computed trip length.
        days: i64,
        /// The shortest accepted trip.
        min: u32,
        /// The longest accepted trip.
        max: u32,
    },

    /// Text did not describe a valid itinerary.
    #[error("invalid itinerary: {0}")]
    InvalidItinerary(#[source] serde_json::Error),
}

/// A specialized Result type for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;
