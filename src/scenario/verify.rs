//! Body checks for strict verification.
//!
//! Each check receives the parsed response body and returns a description
//! of the first mismatch.

use serde_json::{json, Value};

use super::payloads::{self, Booking};

/// Compare the values found at dot paths ("booking.firstname") against
/// expected values.
pub fn check_fields(body: &Value, expected: &[(&str, Value)]) -> Result<(), String> {
    for (path, want) in expected {
        let pointer = format!("/{}", path.replace('.', "/"));
        match body.pointer(&pointer) {
            Some(actual) if actual == want => {}
            Some(actual) => {
                return Err(format!("{} expected {} but was {}", path, want, actual));
            }
            None => return Err(format!("{} missing from response", path)),
        }
    }
    Ok(())
}

fn booking_fields(prefix: &str, booking: &Booking) -> Vec<(String, Value)> {
    let key = |field: &str| {
        if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        }
    };
    vec![
        (key("firstname"), json!(booking.firstname)),
        (key("lastname"), json!(booking.lastname)),
        (key("totalprice"), json!(booking.totalprice)),
        (key("depositpaid"), json!(booking.depositpaid)),
    ]
}

fn check_owned(body: &Value, expected: Vec<(String, Value)>) -> Result<(), String> {
    let borrowed: Vec<(&str, Value)> = expected
        .iter()
        .map(|(path, value)| (path.as_str(), value.clone()))
        .collect();
    check_fields(body, &borrowed)
}

/// `POST /booking` echoes the booking under `booking`
pub fn created_booking(body: &Value) -> Result<(), String> {
    check_owned(body, booking_fields("booking", &payloads::new_booking()))
}

/// `GET /booking/{id}` right after creation returns the created fields
pub fn fetched_booking(body: &Value) -> Result<(), String> {
    let booking = payloads::new_booking();
    check_fields(
        body,
        &[
            ("firstname", json!(booking.firstname)),
            ("lastname", json!(booking.lastname)),
            ("totalprice", json!(booking.totalprice)),
            ("bookingdates.checkin", json!(booking.bookingdates.checkin)),
            ("bookingdates.checkout", json!(booking.bookingdates.checkout)),
        ],
    )
}

pub fn replaced_booking(body: &Value) -> Result<(), String> {
    check_owned(body, booking_fields("", &payloads::replacement_booking()))
}

pub fn patched_booking(body: &Value) -> Result<(), String> {
    let change = payloads::name_change();
    check_fields(
        body,
        &[
            ("firstname", json!(change.firstname)),
            ("lastname", json!(change.lastname)),
        ],
    )
}

/// Unfiltered listing must be non-empty with a `bookingid` on every item
pub fn full_listing(items: &[Value]) -> Result<(), String> {
    if items.is_empty() {
        return Err("booking list is empty".to_string());
    }
    match items.iter().position(|item| item.get("bookingid").is_none()) {
        Some(index) => Err(format!("item {} has no bookingid", index)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created_booking_matches() {
        let body = json!({
            "bookingid": 12,
            "booking": payloads::to_json(&payloads::new_booking()),
        });
        assert!(created_booking(&body).is_ok());
    }

    #[test]
    fn test_mismatch_names_path_and_values() {
        let body = json!({ "firstname": "Jane", "lastname": "Doe" });
        let err = fetched_booking(&body).unwrap_err();
        assert_eq!(err, r#"firstname expected "John" but was "Jane""#);
    }

    #[test]
    fn test_missing_nested_field() {
        let body = json!({ "firstname": "Michael" });
        let err = patched_booking(&body).unwrap_err();
        assert_eq!(err, "lastname missing from response");
    }

    #[test]
    fn test_replaced_booking_checks_deposit() {
        let mut body = payloads::to_json(&payloads::replacement_booking());
        assert!(replaced_booking(&body).is_ok());
        body["depositpaid"] = json!(true);
        assert!(replaced_booking(&body).unwrap_err().starts_with("depositpaid"));
    }

    #[test]
    fn test_full_listing_rules() {
        assert!(full_listing(&[]).is_err());
        assert!(full_listing(&[json!({"bookingid": 1}), json!({"bookingid": 2})]).is_ok());
        assert_eq!(
            full_listing(&[json!({"bookingid": 1}), json!({"id": 2})]).unwrap_err(),
            "item 1 has no bookingid"
        );
    }
}
