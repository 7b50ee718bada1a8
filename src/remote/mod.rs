//! Remote list store adapters.
//!
//! [`RemoteListStore`] is the boundary to wherever saved lists live:
//!
//! - [`DocumentStore`]: file-backed document database (`users/<uid>/priorityLists/<id>.json`)
//! - [`HttpListStore`]: client for the HTTP surface served by `valuerank serve`
//!
//! Adapters normalize timestamps to ISO-8601 and classify failures as
//! retryable or not via [`RemoteError::is_retryable`].

mod document;
mod http;

pub use document::DocumentStore;
pub use http::HttpListStore;

use crate::model::{ListPayload, ListSummary, PriorityList};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCode {
    PermissionDenied,
    InvalidArgument,
    NotFound,
    AlreadyExists,
    FailedPrecondition,
    OutOfRange,
    Unauthenticated,
    Unavailable,
    DeadlineExceeded,
    Aborted,
    ResourceExhausted,
    Internal,
    Unknown,
}

impl ErrorCode {
    /// False for codes where retrying or deferring the write cannot help.
    pub fn is_retryable(self) -> bool {
        !matches!(
            self,
            ErrorCode::PermissionDenied
                | ErrorCode::InvalidArgument
                | ErrorCode::NotFound
                | ErrorCode::AlreadyExists
                | ErrorCode::FailedPrecondition
                | ErrorCode::OutOfRange
                | ErrorCode::Unauthenticated
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::PermissionDenied => "permission-denied",
            ErrorCode::InvalidArgument => "invalid-argument",
            ErrorCode::NotFound => "not-found",
            ErrorCode::AlreadyExists => "already-exists",
            ErrorCode::FailedPrecondition => "failed-precondition",
            ErrorCode::OutOfRange => "out-of-range",
            ErrorCode::Unauthenticated => "unauthenticated",
            ErrorCode::Unavailable => "unavailable",
            ErrorCode::DeadlineExceeded => "deadline-exceeded",
            ErrorCode::Aborted => "aborted",
            ErrorCode::ResourceExhausted => "resource-exhausted",
            ErrorCode::Internal => "internal",
            ErrorCode::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct RemoteError {
    pub code: ErrorCode,
    pub message: String,
}

impl RemoteError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, what)
    }

    pub fn is_retryable(&self) -> bool {
        self.code.is_retryable()
    }

    pub fn user_message(&self) -> String {
        match self.code {
            ErrorCode::PermissionDenied => "You don't have permission to change this list",
            ErrorCode::Unauthenticated => "Please sign in to save your values",
            ErrorCode::NotFound => "Error: Could not find list to update",
            ErrorCode::InvalidArgument | ErrorCode::OutOfRange => "That list could not be saved",
            ErrorCode::AlreadyExists | ErrorCode::FailedPrecondition | ErrorCode::Aborted => {
                "The list changed elsewhere, please reload"
            }
            ErrorCode::Unavailable
            | ErrorCode::DeadlineExceeded
            | ErrorCode::ResourceExhausted
            | ErrorCode::Internal
            | ErrorCode::Unknown => "Could not reach the server",
        }
        .to_string()
    }
}

/// Where saved priority lists live. Every list is scoped to one user.
#[async_trait]
pub trait RemoteListStore: Send + Sync {
    async fn create(&self, user_id: &str, payload: &ListPayload) -> Result<String, RemoteError>;

    async fn update(
        &self,
        user_id: &str,
        list_id: &str,
        payload: &ListPayload,
    ) -> Result<(), RemoteError>;

    async fn get(&self, user_id: &str, list_id: &str) -> Result<Option<PriorityList>, RemoteError>;

    /// Summaries ordered by `updated_at`, newest first.
    async fn list(&self, user_id: &str) -> Result<Vec<ListSummary>, RemoteError>;

    async fn delete(&self, user_id: &str, list_id: &str) -> Result<(), RemoteError>;
}
