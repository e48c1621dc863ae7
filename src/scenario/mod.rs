//! Named scenarios exercised against the booking API.
//!
//! Scenarios are separately invocable but not independent: get, update,
//! partial-update and delete act on the booking tracked in the session and
//! create one first when none is tracked.

pub mod payloads;
pub mod verify;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How much of a response body a scenario checks beyond the status code
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verification {
    /// Status code only, plus what side effects need (booking id, list count)
    #[default]
    Lenient,
    /// Also assert individual field values against the fixed payloads
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scenario {
    HealthCheck,
    CreateBooking,
    GetBooking,
    GetAllBookings,
    GetBookingsByName,
    UpdateBooking,
    PartialUpdate,
    DeleteBooking,
    InvalidData,
    NonExistent,
}

impl Scenario {
    /// Every scenario in suite order: the booking lifecycle first, then the
    /// stateless checks.
    pub const ALL: [Scenario; 10] = [
        Scenario::CreateBooking,
        Scenario::GetBooking,
        Scenario::GetAllBookings,
        Scenario::GetBookingsByName,
        Scenario::UpdateBooking,
        Scenario::PartialUpdate,
        Scenario::DeleteBooking,
        Scenario::HealthCheck,
        Scenario::InvalidData,
        Scenario::NonExistent,
    ];

    /// Stable identifier used by the CLI and the HTTP routes
    pub fn slug(self) -> &'static str {
        match self {
            Scenario::HealthCheck => "health",
            Scenario::CreateBooking => "create-booking",
            Scenario::GetBooking => "get-booking",
            Scenario::GetAllBookings => "get-all-bookings",
            Scenario::GetBookingsByName => "get-bookings-by-name",
            Scenario::UpdateBooking => "update-booking",
            Scenario::PartialUpdate => "partial-update",
            Scenario::DeleteBooking => "delete-booking",
            Scenario::InvalidData => "invalid-data",
            Scenario::NonExistent => "non-existent",
        }
    }

    /// Human-readable test name carried in the outcome record
    pub fn display_name(self) -> &'static str {
        match self {
            Scenario::HealthCheck => "Health Check",
            Scenario::CreateBooking => "Create Booking",
            Scenario::GetBooking => "Get Booking by ID",
            Scenario::GetAllBookings => "Get All Bookings",
            Scenario::GetBookingsByName => "Get Bookings by Name",
            Scenario::UpdateBooking => "Update Booking (PUT)",
            Scenario::PartialUpdate => "Partial Update (PATCH)",
            Scenario::DeleteBooking => "Delete Booking",
            Scenario::InvalidData => "Create Booking with Invalid Data",
            Scenario::NonExistent => "Get Non-Existent Booking",
        }
    }

    /// Status code the remote API answers with when it behaves correctly
    pub fn expected_status(self) -> u16 {
        match self {
            Scenario::HealthCheck | Scenario::DeleteBooking => 201,
            Scenario::InvalidData => 500,
            Scenario::NonExistent => 404,
            _ => 200,
        }
    }

    /// Whether the scenario acts on the tracked booking
    pub fn needs_booking(self) -> bool {
        matches!(
            self,
            Scenario::GetBooking
                | Scenario::UpdateBooking
                | Scenario::PartialUpdate
                | Scenario::DeleteBooking
        )
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Scenario {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scenario::ALL
            .into_iter()
            .find(|scenario| scenario.slug() == s)
            .ok_or_else(|| format!("Unknown scenario: {}", s))
    }
}
