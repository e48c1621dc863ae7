use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Identifier probed by the non-existent scenario
pub const MISSING_BOOKING_ID: i64 = 999_999;

/// Name pair used by the filtered listing
pub const FILTER_FIRSTNAME: &str = "John";
pub const FILTER_LASTNAME: &str = "Doe";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingDates {
    pub checkin: String,
    pub checkout: String,
}

/// Full booking as accepted by `POST /booking` and `PUT /booking/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub firstname: String,
    pub lastname: String,
    pub totalprice: i64,
    pub depositpaid: bool,
    pub bookingdates: BookingDates,
    pub additionalneeds: String,
}

/// Partial booking for `PATCH /booking/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameChange {
    pub firstname: String,
    pub lastname: String,
}

pub fn new_booking() -> Booking {
    Booking {
        firstname: "John".to_string(),
        lastname: "Doe".to_string(),
        totalprice: 150,
        depositpaid: true,
        bookingdates: BookingDates {
            checkin: "2024-12-01".to_string(),
            checkout: "2024-12-10".to_string(),
        },
        additionalneeds: "Breakfast".to_string(),
    }
}

pub fn replacement_booking() -> Booking {
    Booking {
        firstname: "Jane".to_string(),
        lastname: "Smith".to_string(),
        totalprice: 200,
        depositpaid: false,
        bookingdates: BookingDates {
            checkin: "2024-12-15".to_string(),
            checkout: "2024-12-20".to_string(),
        },
        additionalneeds: "Lunch".to_string(),
    }
}

pub fn name_change() -> NameChange {
    NameChange {
        firstname: "Michael".to_string(),
        lastname: "Johnson".to_string(),
    }
}

/// Booking missing every required field except `firstname`
pub fn invalid_booking() -> Value {
    json!({ "firstname": "Test" })
}

/// Serialize a payload; the payload types here are plain data and cannot fail.
pub fn to_json<T: Serialize>(payload: &T) -> Value {
    serde_json::to_value(payload).unwrap_or(Value::Null)
}
