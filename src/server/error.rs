use crate::error::RankError;
use crate::remote::{ErrorCode, RemoteError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Error type for HTTP responses. Renders as `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError(pub RankError);

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(RankError::Validation(msg.into()))
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self(RankError::NotFound(what.into()))
    }

    pub fn status(&self) -> StatusCode {
        match &self.0 {
            RankError::Validation(_)
            | RankError::CapacityExceeded { .. }
            | RankError::InvalidSlot { .. } => StatusCode::BAD_REQUEST,
            RankError::NotFound(_) | RankError::ValueNotFound(_) => StatusCode::NOT_FOUND,
            RankError::SaveInProgress(_) => StatusCode::CONFLICT,
            RankError::Remote(e) => remote_status(e.code),
            RankError::StorageQuotaExceeded { .. } => StatusCode::INSUFFICIENT_STORAGE,
            RankError::Config(_)
            | RankError::Storage(_)
            | RankError::Io(_)
            | RankError::Json(_)
            | RankError::Toml(_)
            | RankError::NotInitialized
            | RankError::AlreadyInitialized(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match &self.0 {
            RankError::Validation(msg) => msg.clone(),
            RankError::NotFound(_) => "List not found".to_string(),
            RankError::Remote(e) if e.code == ErrorCode::NotFound => "List not found".to_string(),
            RankError::Remote(e) => e.message.clone(),
            other => other.to_string(),
        }
    }
}

fn remote_status(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidArgument | ErrorCode::OutOfRange => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthenticated => StatusCode::UNAUTHORIZED,
        ErrorCode::PermissionDenied => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::AlreadyExists | ErrorCode::FailedPrecondition | ErrorCode::Aborted => {
            StatusCode::CONFLICT
        }
        ErrorCode::Unavailable | ErrorCode::DeadlineExceeded | ErrorCode::ResourceExhausted => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        ErrorCode::Internal | ErrorCode::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        }
        let body = serde_json::json!({ "error": self.message() });
        (status, axum::Json(body)).into_response()
    }
}

impl From<RankError> for ApiError {
    fn from(err: RankError) -> Self {
        Self(err)
    }
}

impl From<RemoteError> for ApiError {
    fn from(err: RemoteError) -> Self {
        Self(RankError::Remote(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: impl Into<ApiError>) -> StatusCode {
        err.into().into_response().status()
    }

    #[test]
    fn validation_maps_to_400() {
        assert_eq!(status_of(ApiError::bad_request("User ID is required")), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_maps_to_404() {
        assert_eq!(status_of(ApiError::not_found("abc")), StatusCode::NOT_FOUND);
        assert_eq!(status_of(RemoteError::not_found("abc")), StatusCode::NOT_FOUND);
    }

    #[test]
    fn permission_denied_maps_to_403() {
        let err = RemoteError::new(ErrorCode::PermissionDenied, "nope");
        assert_eq!(status_of(err), StatusCode::FORBIDDEN);
    }

    #[test]
    fn unauthenticated_maps_to_401() {
        let err = RemoteError::new(ErrorCode::Unauthenticated, "sign in");
        assert_eq!(status_of(err), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn already_exists_maps_to_409() {
        let err = RemoteError::new(ErrorCode::AlreadyExists, "dup");
        assert_eq!(status_of(err), StatusCode::CONFLICT);
    }

    #[test]
    fn unavailable_maps_to_503() {
        let err = RemoteError::new(ErrorCode::Unavailable, "down");
        assert_eq!(status_of(err), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn io_error_maps_to_500() {
        let err = RankError::Io(std::io::Error::other("disk full"));
        assert_eq!(status_of(err), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn response_body_is_json() {
        let response = ApiError::not_found("abc").into_response();
        let ct = response
            .headers()
            .get(axum::http::header::CONTENT_TYPE)
            .expect("should have content-type");
        assert!(ct.to_str().unwrap().contains("application/json"));
    }
}
