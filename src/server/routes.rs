use super::AppState;
use super::error::ApiError;
use crate::model::{ListPayload, ListSummary, PriorityList, SaveRequest, SaveResponse};
use crate::validation;
use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    #[serde(default)]
    pub user_id: String,
}

fn require_user(user_id: &str) -> Result<(), ApiError> {
    validation::validate_user_id(user_id).map_err(ApiError::from)
}

/// GET /health
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// GET /lists?userId=: the user's lists, newest first.
pub async fn list_lists(
    State(app): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<ListSummary>>, ApiError> {
    require_user(&query.user_id)?;
    let lists = app.store.list(&query.user_id).await?;
    Ok(Json(lists))
}

/// GET /lists/{listId}?userId=: one list.
pub async fn get_list(
    State(app): State<AppState>,
    Path(list_id): Path<String>,
    Query(query): Query<UserQuery>,
) -> Result<Json<PriorityList>, ApiError> {
    require_user(&query.user_id)?;
    validation::validate_list_id(&list_id)?;
    let list = app
        .store
        .get(&query.user_id, &list_id)
        .await?
        .ok_or_else(|| ApiError::not_found(list_id))?;
    Ok(Json(list))
}

/// POST /lists: creates a list, or updates it when `listId` is given.
pub async fn save_list(
    State(app): State<AppState>,
    Json(body): Json<SaveRequest>,
) -> Result<Json<SaveResponse>, ApiError> {
    require_user(&body.user_id)?;
    let payload = ListPayload::new(body.list_name, body.values);

    let list_id = match body.list_id.filter(|id| !id.trim().is_empty()) {
        Some(list_id) => {
            validation::validate_list_id(&list_id)?;
            app.store.update(&body.user_id, &list_id, &payload).await?;
            list_id
        }
        None => app.store.create(&body.user_id, &payload).await?,
    };

    Ok(Json(SaveResponse {
        success: true,
        list_id,
    }))
}

/// DELETE /lists/{listId}?userId=
pub async fn delete_list(
    State(app): State<AppState>,
    Path(list_id): Path<String>,
    Query(query): Query<UserQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_user(&query.user_id)?;
    validation::validate_list_id(&list_id)?;
    app.store.delete(&query.user_id, &list_id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}
