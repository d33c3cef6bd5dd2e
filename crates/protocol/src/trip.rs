//! Trip windows and trip length calculation.
//!
//! A [`TripDraft`] holds the possibly incomplete values a user entered for a
//! trip. Validating it against [`TripLimits`] yields a [`TripWindow`], the
//! input required to request an itinerary suggestion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ProtocolError, Result};

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Default minimum trip length accepted for suggestions.
pub const DEFAULT_MIN_TRIP_DAYS: u32 = 1;

/// Default maximum trip length accepted for suggestions.
pub const DEFAULT_MAX_TRIP_DAYS: u32 = 10;

/// Returns the number of days between two timestamps, rounded up.
///
/// A partial day counts as a full day. Identical timestamps give `0` and an
/// end before the start gives a negative count.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use tripboard_protocol::trip_days;
///
/// let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let end = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
/// assert_eq!(trip_days(start, end), 14);
/// ```
#[must_use]
pub fn trip_days(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let seconds = (end - start).num_seconds();
    let days = seconds / SECONDS_PER_DAY;
    if seconds % SECONDS_PER_DAY > 0 {
        days + 1
    } else {
        days
    }
}

/// Inclusive bounds on the trip length accepted for suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripLimits {
    /// Shortest accepted trip, in days.
    pub min_days: u32,
    /// Longest accepted trip, in days.
    pub max_days: u32,
}

impl Default for TripLimits {
    fn default() -> Self {
        Self {
            min_days: DEFAULT_MIN_TRIP_DAYS,
            max_days: DEFAULT_MAX_TRIP_DAYS,
        }
    }
}

impl TripLimits {
    /// Returns `true` if `days` lies within the limits.
    #[must_use]
    pub fn contains(&self, days: i64) -> bool {
        days >= i64::from(self.min_days) && days <= i64::from(self.max_days)
    }
}

/// Trip values as entered by the user, any of which may be missing.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use tripboard_protocol::{TripDraft, TripLimits};
///
/// let draft = TripDraft {
///     location: Some("Kyoto".to_string()),
///     start_date: Some(Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap()),
///     end_date: Some(Utc.with_ymd_and_hms(2024, 4, 4, 0, 0, 0).unwrap()),
/// };
///
/// let window = draft.validate(&TripLimits::default()).unwrap();
/// assert_eq!(window.days, 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripDraft {
    /// Destination of the trip.
    pub location: Option<String>,
    /// When the trip starts.
    pub start_date: Option<DateTime<Utc>>,
    /// When the trip ends.
    pub end_date: Option<DateTime<Utc>>,
}

impl TripDraft {
    /// Validates the draft, producing a trip window.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::MissingTripField`] if the location is blank or
    /// a date is missing, and [`ProtocolError::TripLengthOutOfRange`] if the
    /// trip length falls outside `limits`.
    pub fn validate(&self, limits: &TripLimits) -> Result<TripWindow> {
        let location = self
            .location
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .ok_or(ProtocolError::MissingTripField("location"))?;
        let start_date = self
            .start_date
            .ok_or(ProtocolError::MissingTripField("start date"))?;
        let end_date = self
            .end_date
            .ok_or(ProtocolError::MissingTripField("end date"))?;

        let days = trip_days(start_date, end_date);
        if !limits.contains(days) {
            return Err(ProtocolError::TripLengthOutOfRange {
                days,
                min: limits.min_days,
                max: limits.max_days,
            });
        }

        Ok(TripWindow {
            location: location.to_string(),
            start_date,
            end_date,
            // `contains` bounds the value to the u32 limits
            days: u32::try_from(days).unwrap_or(limits.max_days),
        })
    }
}

/// A validated trip: a location and a trip length within the limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripWindow {
    /// Destination of the trip.
    pub location: String,
    /// When the trip starts.
    pub start_date: DateTime<Utc>,
    /// When the trip ends.
    pub end_date: DateTime<Utc>,
    /// Trip length in days.
    pub days: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn draft(start: DateTime<Utc>, end: DateTime<Utc>) -> TripDraft {
        TripDraft {
            location: Some("Lisbon".to_string()),
            start_date: Some(start),
            end_date: Some(end),
        }
    }

    #[test]
    fn trip_days_rounds_partial_days_up() {
        let start = date(2024, 1, 1);
        assert_eq!(trip_days(start, start), 0);
        assert_eq!(trip_days(start, start + chrono::Duration::hours(1)), 1);
        assert_eq!(trip_days(start, date(2024, 1, 3)), 2);
        assert_eq!(trip_days(date(2024, 1, 3), start), -2);
    }

    #[test]
    fn two_week_trip_is_rejected() {
        let err = draft(date(2024, 1, 1), date(2024, 1, 15))
            .validate(&TripLimits::default())
            .unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::TripLengthOutOfRange {
                days: 14,
                min: 1,
                max: 10
            }
        ));
    }

    #[test]
    fn same_day_trip_is_rejected() {
        let err = draft(date(2024, 1, 1), date(2024, 1, 1))
            .validate(&TripLimits::default())
            .unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::TripLengthOutOfRange { days: 0, .. }
        ));
    }

    #[test]
    fn limits_are_inclusive() {
        let limits = TripLimits::default();
        assert!(draft(date(2024, 1, 1), date(2024, 1, 2)).validate(&limits).is_ok());
        assert!(draft(date(2024, 1, 1), date(2024, 1, 11)).validate(&limits).is_ok());
        assert!(draft(date(2024, 1, 1), date(2024, 1, 12)).validate(&limits).is_err());
    }

    #[test]
    fn missing_fields_are_reported_in_order() {
        let err = TripDraft::default()
            .validate(&TripLimits::default())
            .unwrap_err();
        assert!(matches!(err, ProtocolError::MissingTripField("location")));

        let mut blank = draft(date(2024, 1, 1), date(2024, 1, 2));
        blank.location = Some("   ".to_string());
        assert!(matches!(
            blank.validate(&TripLimits::default()),
            Err(ProtocolError::MissingTripField("location"))
        ));

        let mut no_end = draft(date(2024, 1, 1), date(2024, 1, 2));
        no_end.end_date = None;
        assert!(matches!(
            no_end.validate(&TripLimits::default()),
            Err(ProtocolError::MissingTripField("end date"))
        ));
    }

    #[test]
    fn window_trims_location() {
        let mut d = draft(date(2024, 1, 1), date(2024, 1, 4));
        d.location = Some("  Porto ".to_string());
        let window = d.validate(&TripLimits::default()).unwrap();
        assert_eq!(window.location, "Porto");
        assert_eq!(window.days, 3);
    }
}
