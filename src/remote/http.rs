use super::{ErrorCode, RemoteError, RemoteListStore};
use crate::model::{ListPayload, ListSummary, PriorityList, SaveRequest, SaveResponse};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Client for the `valuerank serve` HTTP surface.
#[derive(Debug, Clone)]
pub struct HttpListStore {
    client: Client,
    base_url: Url,
}

impl HttpListStore {
    pub fn new(base_url: &str) -> Result<Self, RemoteError> {
        // reqwest is built without a default crypto provider
        let _ = rustls::crypto::ring::default_provider().install_default();

        let mut base_url = Url::parse(base_url).map_err(|e| {
            RemoteError::new(
                ErrorCode::InvalidArgument,
                format!("invalid remote url {}: {}", base_url, e),
            )
        })?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RemoteError::new(ErrorCode::Internal, e.to_string()))?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url, RemoteError> {
        self.base_url
            .join(path)
            .map_err(|e| RemoteError::new(ErrorCode::InvalidArgument, e.to_string()))
    }

    fn list_url(&self, user_id: &str, list_id: Option<&str>) -> Result<Url, RemoteError> {
        let mut url = self.endpoint("lists")?;
        if let Some(list_id) = list_id {
            url.path_segments_mut()
                .map_err(|_| RemoteError::new(ErrorCode::InvalidArgument, "url cannot be a base"))?
                .push(list_id);
        }
        url.query_pairs_mut().append_pair("userId", user_id);
        Ok(url)
    }

    async fn save(&self, request: &SaveRequest) -> Result<String, RemoteError> {
        let url = self.endpoint("lists")?;
        tracing::debug!(url = %url, user_id = %request.user_id, "POST list");
        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;
        let body: SaveResponse = check(response).await?.json().await.map_err(decode_error)?;
        Ok(body.list_id)
    }
}

fn status_code(status: StatusCode) -> ErrorCode {
    match status {
        StatusCode::BAD_REQUEST => ErrorCode::InvalidArgument,
        StatusCode::UNAUTHORIZED => ErrorCode::Unauthenticated,
        StatusCode::FORBIDDEN => ErrorCode::PermissionDenied,
        StatusCode::NOT_FOUND => ErrorCode::NotFound,
        StatusCode::CONFLICT => ErrorCode::AlreadyExists,
        StatusCode::PRECONDITION_FAILED => ErrorCode::FailedPrecondition,
        StatusCode::TOO_MANY_REQUESTS => ErrorCode::ResourceExhausted,
        StatusCode::SERVICE_UNAVAILABLE | StatusCode::BAD_GATEWAY => ErrorCode::Unavailable,
        StatusCode::GATEWAY_TIMEOUT | StatusCode::REQUEST_TIMEOUT => ErrorCode::DeadlineExceeded,
        s if s.is_server_error() => ErrorCode::Internal,
        _ => ErrorCode::Unknown,
    }
}

fn transport_error(e: reqwest::Error) -> RemoteError {
    let code = if e.is_timeout() {
        ErrorCode::DeadlineExceeded
    } else if e.is_connect() || e.is_request() {
        ErrorCode::Unavailable
    } else {
        ErrorCode::Unknown
    };
    RemoteError::new(code, e.to_string())
}

fn decode_error(e: reqwest::Error) -> RemoteError {
    RemoteError::new(ErrorCode::Internal, format!("unexpected response: {}", e))
}

async fn check(response: Response) -> Result<Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status.to_string(),
    };
    Err(RemoteError::new(status_code(status), message))
}

#[async_trait]
impl RemoteListStore for HttpListStore {
    async fn create(&self, user_id: &str, payload: &ListPayload) -> Result<String, RemoteError> {
        self.save(&SaveRequest {
            user_id: user_id.to_string(),
            list_name: payload.list_name.clone(),
            values: payload.values.clone(),
            list_id: None,
        })
        .await
    }

    async fn update(
        &self,
        user_id: &str,
        list_id: &str,
        payload: &ListPayload,
    ) -> Result<(), RemoteError> {
        self.save(&SaveRequest {
            user_id: user_id.to_string(),
            list_name: payload.list_name.clone(),
            values: payload.values.clone(),
            list_id: Some(list_id.to_string()),
        })
        .await
        .map(|_| ())
    }

    async fn get(&self, user_id: &str, list_id: &str) -> Result<Option<PriorityList>, RemoteError> {
        let url = self.list_url(user_id, Some(list_id))?;
        tracing::debug!(url = %url, "GET list");
        let response = self.client.get(url).send().await.map_err(transport_error)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let list = check(response).await?.json().await.map_err(decode_error)?;
        Ok(Some(list))
    }

    async fn list(&self, user_id: &str) -> Result<Vec<ListSummary>, RemoteError> {
        let url = self.list_url(user_id, None)?;
        tracing::debug!(url = %url, "GET lists");
        let response = self.client.get(url).send().await.map_err(transport_error)?;
        check(response).await?.json().await.map_err(decode_error)
    }

    async fn delete(&self, user_id: &str, list_id: &str) -> Result<(), RemoteError> {
        let url = self.list_url(user_id, Some(list_id))?;
        tracing::debug!(url = %url, "DELETE list");
        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(transport_error)?;
        check(response).await?;
        Ok(())
    }
}
