use thiserror::Error;

use crate::remote::RemoteError;

#[derive(Error, Debug)]
pub enum RankError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Maximum of {max} priorities reached")]
    CapacityExceeded { max: usize },

    #[error("No value at position {index} in {group}")]
    InvalidSlot { group: String, index: usize },

    #[error("Value not found: {0}")]
    ValueNotFound(String),

    #[error("List not found: {0}")]
    NotFound(String),

    #[error("A save for {0} is already in progress")]
    SaveInProgress(String),

    #[error("Remote store error: {0}")]
    Remote(#[from] RemoteError),

    #[error("Local storage quota exceeded while writing {key}")]
    StorageQuotaExceeded { key: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Project not initialized. Run 'valuerank init' first.")]
    NotInitialized,

    #[error("Project already initialized at {0}")]
    AlreadyInitialized(String),
}

impl RankError {
    /// Short message suitable for showing to a person.
    pub fn user_message(&self) -> String {
        match self {
            RankError::Validation(msg) => msg.clone(),
            RankError::CapacityExceeded { max } => {
                format!("Maximum of {} priorities reached", max)
            }
            RankError::InvalidSlot { .. } | RankError::ValueNotFound(_) => {
                "That value is not where you expected it".to_string()
            }
            RankError::NotFound(_) => "Failed to load list: No data found".to_string(),
            RankError::SaveInProgress(_) => "A save is already in progress".to_string(),
            RankError::Remote(e) => e.user_message(),
            RankError::StorageQuotaExceeded { .. } => {
                "Failed to save offline: Storage limit exceeded".to_string()
            }
            RankError::Storage(_) | RankError::Io(_) | RankError::Json(_) => {
                "Failed to save offline".to_string()
            }
            RankError::Config(_) | RankError::Toml(_) => {
                "Configuration could not be loaded".to_string()
            }
            RankError::NotInitialized => self.to_string(),
            RankError::AlreadyInitialized(_) => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RankError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::ErrorCode;

    #[test]
    fn test_capacity_message() {
        let err = RankError::CapacityExceeded { max: 10 };
        assert_eq!(err.user_message(), "Maximum of 10 priorities reached");
    }

    #[test]
    fn test_quota_message_differs_from_network_message() {
        let quota = RankError::StorageQuotaExceeded {
            key: "offline_saves".to_string(),
        };
        let network = RankError::Remote(RemoteError::new(ErrorCode::Unavailable, "socket closed"));
        assert_ne!(quota.user_message(), network.user_message());
        assert!(quota.user_message().contains("Storage limit"));
    }

    #[test]
    fn test_remote_message_hides_raw_detail() {
        let err = RankError::Remote(RemoteError::new(
            ErrorCode::PermissionDenied,
            "Missing or insufficient permissions at /users/u1",
        ));
        assert!(!err.user_message().contains("/users/u1"));
    }
}
