//! Input validation for users, list names and ids.

use crate::error::{RankError, Result};

/// Maximum allowed length for a list name.
pub const MAX_LIST_NAME_LENGTH: usize = 100;

/// Maximum allowed length for a user or list ID.
pub const MAX_ID_LENGTH: usize = 128;

/// Characters forbidden in IDs to prevent path traversal.
const FORBIDDEN_ID_CHARS: &[char] = &['/', '\\', '\0'];

/// Validates a user ID.
pub fn validate_user_id(user_id: &str) -> Result<()> {
    if user_id.trim().is_empty() {
        return Err(RankError::Validation("User ID is required".to_string()));
    }
    validate_path_safe("User ID", user_id)
}

/// Validates a list ID.
pub fn validate_list_id(list_id: &str) -> Result<()> {
    if list_id.trim().is_empty() {
        return Err(RankError::Validation("List ID is required".to_string()));
    }
    validate_path_safe("List ID", list_id)
}

/// Validates a list name.
pub fn validate_list_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(RankError::Validation(
            "Please enter a name for your priority list".to_string(),
        ));
    }
    if name.chars().count() > MAX_LIST_NAME_LENGTH {
        return Err(RankError::Validation(format!(
            "List name exceeds maximum length of {} characters",
            MAX_LIST_NAME_LENGTH
        )));
    }
    Ok(())
}

fn validate_path_safe(label: &str, id: &str) -> Result<()> {
    if id.len() > MAX_ID_LENGTH {
        return Err(RankError::Validation(format!(
            "{} exceeds maximum length of {} characters",
            label, MAX_ID_LENGTH
        )));
    }
    if id.contains("..") {
        return Err(RankError::Validation(format!(
            "{} cannot contain '..' (path traversal)",
            label
        )));
    }
    for c in FORBIDDEN_ID_CHARS {
        if id.contains(*c) {
            return Err(RankError::Validation(format!(
                "{} cannot contain '{}'",
                label, c
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_user_id_empty() {
        assert!(validate_user_id("").is_err());
        assert!(validate_user_id("   ").is_err());
    }

    #[test]
    fn test_validate_user_id_valid() {
        assert!(validate_user_id("uid-42").is_ok());
    }

    #[test]
    fn test_validate_list_name_blank() {
        let err = validate_list_name("  ").unwrap_err();
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn test_validate_list_name_too_long() {
        let long_name = "a".repeat(MAX_LIST_NAME_LENGTH + 1);
        assert!(validate_list_name(&long_name).is_err());
    }

    #[test]
    fn test_validate_list_id_path_traversal() {
        assert!(validate_list_id("../../../etc/passwd").is_err());
        assert!(validate_list_id("aB3dE9xQ").is_ok());
    }

    #[test]
    fn test_validate_ids_forbidden_chars() {
        assert!(validate_user_id("a/b").is_err());
        assert!(validate_list_id("a\\b").is_err());
    }
}
