use serde::{Deserialize, Serialize};

/// Raw arguments of a `book_appointment` tool call, exactly as the dispatcher
/// hands them over.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BookingArgs {
    pub first_name: String,
    pub last_name: String,
    pub date: String,
    pub phone: String,
}

/// Validated, normalized booking data. Built fresh for every invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingRequest {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPayload {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

/// JSON body posted to the scheduling API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingPayload {
    pub customer: CustomerPayload,
    /// UTC timestamp, `YYYY-MM-DDTHH:MM:SSZ`.
    pub date: String,
    pub status: AppointmentStatus,
}

impl BookingPayload {
    pub fn new(request: BookingRequest, utc_date: String) -> Self {
        Self {
            customer: CustomerPayload {
                first_name: request.first_name,
                last_name: request.last_name,
                phone: request.phone,
            },
            date: utc_date,
            status: AppointmentStatus::Scheduled,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum AppointmentStatus {
    Scheduled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_wire_shape() {
        let request = BookingRequest {
            first_name: "Alice".to_string(),
            last_name: "Smith".to_string(),
            phone: "3312092200".to_string(),
            date: "2025-12-01T10:00:00".to_string(),
        };
        let payload = BookingPayload::new(request, "2025-12-01T09:00:00Z".to_string());

        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(
            json,
            r#"{"customer":{"firstName":"Alice","lastName":"Smith","phone":"3312092200"},"date":"2025-12-01T09:00:00Z","status":"Scheduled"}"#
        );
    }

    #[test]
    fn test_args_reject_unknown_fields() {
        let raw = r#"{"first_name":"a","last_name":"b","date":"2025-12-01","phone":"1234567890","email":"x"}"#;
        assert!(serde_json::from_str::<BookingArgs>(raw).is_err());
    }

    #[test]
    fn test_args_require_all_fields() {
        let raw = r#"{"first_name":"a","last_name":"b","date":"2025-12-01"}"#;
        assert!(serde_json::from_str::<BookingArgs>(raw).is_err());
    }
}
