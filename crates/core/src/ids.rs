//! Parsing of externally supplied entity ids.
//!
//! Path segments arrive as raw strings. A string that cannot be a primary key
//! is reported as [`CoreError::InvalidId`], so callers can tell a malformed id
//! apart from one that is well-formed but absent.

use crate::error::CoreError;
use crate::types::DbId;

/// Parse a raw id for `entity`. Only positive integers are accepted.
pub fn parse_id(entity: &'static str, raw: &str) -> Result<DbId, CoreError> {
    match raw.trim().parse::<DbId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(CoreError::InvalidId {
            entity,
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_id() {
        assert_eq!(parse_id("Event", "42").unwrap(), 42);
        assert_eq!(parse_id("Event", " 7 ").unwrap(), 7);
    }

    #[test]
    fn test_non_numeric_id_is_invalid() {
        let err = parse_id("Event", "65f1c2abc").unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidId { entity: "Event", ref value } if value == "65f1c2abc"
        ));
    }

    #[test]
    fn test_zero_and_negative_ids_are_invalid() {
        assert!(parse_id("Registration", "0").is_err());
        assert!(parse_id("Registration", "-3").is_err());
    }

    #[test]
    fn test_empty_id_is_invalid() {
        assert!(parse_id("User", "").is_err());
    }
}
