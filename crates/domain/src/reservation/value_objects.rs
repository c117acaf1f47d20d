//! Value objects for the reservation domain.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stay from check-in to check-out.
///
/// Ranges are half-open: a stay ending on a day does not overlap a stay
/// starting on that same day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    /// Arrival time.
    pub check_in: DateTime<Utc>,

    /// Departure time.
    pub check_out: DateTime<Utc>,
}

impl DateRange {
    /// Creates a new date range. Validation happens when a reservation is built.
    pub fn new(check_in: DateTime<Utc>, check_out: DateTime<Utc>) -> Self {
        Self {
            check_in,
            check_out,
        }
    }

    /// Returns true if the two ranges share any time.
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.check_in < other.check_out && self.check_out > other.check_in
    }

    /// Returns the number of whole UTC days between check-in and check-out.
    pub fn nights(&self) -> i64 {
        (self.check_out.date_naive() - self.check_in.date_naive()).num_days()
    }
}

/// Contact details for a guest on a reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestInfo {
    pub name: String,
    pub email: String,
    pub phone_number: String,
}

impl GuestInfo {
    /// Creates guest details.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone_number: phone_number.into(),
        }
    }
}
