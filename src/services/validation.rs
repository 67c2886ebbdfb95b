use crate::errors::{ToolError, ValidationReason};
use crate::models::{BookingArgs, BookingRequest};

const PHONE_LENGTH: usize = 10;

/// Trims and capitalizes the names and checks the phone length. The date is
/// passed through untouched; `timezone::normalize_to_utc` owns it.
pub fn validate_args(args: &BookingArgs) -> Result<BookingRequest, ToolError> {
    let first_name = capitalize(args.first_name.trim());
    let last_name = capitalize(args.last_name.trim());

    if first_name.is_empty() || last_name.is_empty() {
        return Err(ToolError::Validation(ValidationReason::EmptyName));
    }

    if args.phone.chars().count() != PHONE_LENGTH {
        return Err(ToolError::Validation(ValidationReason::InvalidPhone));
    }

    Ok(BookingRequest {
        first_name,
        last_name,
        phone: args.phone.clone(),
        date: args.date.clone(),
    })
}

/// Upper-cases the first character and lower-cases the rest.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(first: &str, last: &str, phone: &str) -> BookingArgs {
        BookingArgs {
            first_name: first.to_string(),
            last_name: last.to_string(),
            date: "2025-12-01T10:00:00".to_string(),
            phone: phone.to_string(),
        }
    }

    #[test]
    fn test_names_trimmed_and_capitalized() {
        let req = validate_args(&args("  alice ", "SMITH", "3312092200")).unwrap();
        assert_eq!(req.first_name, "Alice");
        assert_eq!(req.last_name, "Smith");
        assert_eq!(req.phone, "3312092200");
        assert_eq!(req.date, "2025-12-01T10:00:00");
    }

    #[test]
    fn test_capitalize_non_ascii() {
        assert_eq!(capitalize("élodie"), "Élodie");
        assert_eq!(capitalize("mcDonald"), "Mcdonald");
    }

    #[test]
    fn test_blank_names_rejected() {
        for (first, last) in [("", "Smith"), ("Alice", "   "), ("\t\n", "")] {
            let err = validate_args(&args(first, last, "3312092200")).unwrap_err();
            assert_eq!(err, ToolError::Validation(ValidationReason::EmptyName));
        }
    }

    #[test]
    fn test_phone_length_enforced() {
        for phone in ["", "123456789", "12345678901", "+393312092200"] {
            let err = validate_args(&args("Alice", "Smith", phone)).unwrap_err();
            assert_eq!(err, ToolError::Validation(ValidationReason::InvalidPhone));
        }
    }

    #[test]
    fn test_phone_length_only() {
        // Only the length is checked, not the character class.
        assert!(validate_args(&args("Alice", "Smith", "331-209-22")).is_ok());
    }

    #[test]
    fn test_name_checked_before_phone() {
        let err = validate_args(&args("", "Smith", "1")).unwrap_err();
        assert_eq!(err, ToolError::Validation(ValidationReason::EmptyName));
    }
}
