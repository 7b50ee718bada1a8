use super::{ErrorCode, RemoteError, RemoteListStore};
use crate::model::{ListPayload, ListSummary, ListValues, PriorityList, UNTITLED_LIST};
use crate::validation;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const ID_ALPHABET: [char; 62] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i',
    'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z', 'A', 'B',
    'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U',
    'V', 'W', 'X', 'Y', 'Z',
];

const VALUE_ID_ALPHABET: [char; 36] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i',
    'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

/// Store-native timestamp, as the document database records it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct StoreTimestamp {
    seconds: i64,
    nanoseconds: u32,
}

impl StoreTimestamp {
    fn now() -> Self {
        let now = Utc::now();
        Self {
            seconds: now.timestamp(),
            nanoseconds: now.timestamp_subsec_nanos(),
        }
    }

    fn to_iso8601(self) -> String {
        DateTime::<Utc>::from_timestamp(self.seconds, self.nanoseconds)
            .unwrap_or_else(Utc::now)
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

fn normalize_timestamp(ts: Option<StoreTimestamp>) -> String {
    ts.unwrap_or_else(StoreTimestamp::now).to_iso8601()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredDocument {
    #[serde(default)]
    list_name: String,
    #[serde(default)]
    values: ListValues,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<StoreTimestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<StoreTimestamp>,
}

impl StoredDocument {
    fn into_list(self, id: String) -> PriorityList {
        PriorityList {
            id,
            list_name: if self.list_name.trim().is_empty() {
                UNTITLED_LIST.to_string()
            } else {
                self.list_name
            },
            values: self.values,
            created_at: normalize_timestamp(self.created_at),
            updated_at: normalize_timestamp(self.updated_at),
        }
    }
}

/// Fills in what a client may leave out: value ids, content, list name.
fn normalize_payload(payload: &ListPayload) -> ListPayload {
    let mut values = payload.values.clone();
    for value in &mut values.selected_group_values {
        if value.id.trim().is_empty() {
            value.id = format!(
                "value-{}",
                nanoid::format(nanoid::rngs::default, &VALUE_ID_ALPHABET, 7)
            );
        }
    }
    let list_name = payload.list_name.trim();
    ListPayload {
        list_name: if list_name.is_empty() {
            UNTITLED_LIST.to_string()
        } else {
            list_name.to_string()
        },
        values,
    }
}

fn io_error(e: std::io::Error) -> RemoteError {
    let code = match e.kind() {
        std::io::ErrorKind::PermissionDenied => ErrorCode::PermissionDenied,
        std::io::ErrorKind::NotFound => ErrorCode::NotFound,
        _ => ErrorCode::Unavailable,
    };
    RemoteError::new(code, e.to_string())
}

fn invalid(e: crate::error::RankError) -> RemoteError {
    RemoteError::new(ErrorCode::InvalidArgument, e.to_string())
}

/// File-backed document database.
///
/// Layout: `<root>/users/<userId>/priorityLists/<listId>.json`.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    fn lists_dir(&self, user_id: &str) -> Result<PathBuf, RemoteError> {
        validation::validate_user_id(user_id).map_err(invalid)?;
        Ok(self.root.join("users").join(user_id).join("priorityLists"))
    }

    fn doc_path(&self, user_id: &str, list_id: &str) -> Result<PathBuf, RemoteError> {
        validation::validate_list_id(list_id).map_err(invalid)?;
        Ok(self.lists_dir(user_id)?.join(format!("{}.json", list_id)))
    }

    fn generate_id(&self) -> String {
        nanoid::format(nanoid::rngs::default, &ID_ALPHABET, 20)
    }

    fn read_doc(path: &Path) -> Result<Option<StoredDocument>, RemoteError> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path).map_err(io_error)?;
        let doc = serde_json::from_str(&content)
            .map_err(|e| RemoteError::new(ErrorCode::Internal, format!("corrupt document: {}", e)))?;
        Ok(Some(doc))
    }

    fn write_doc(path: &Path, doc: &StoredDocument) -> Result<(), RemoteError> {
        let dir = path
            .parent()
            .ok_or_else(|| RemoteError::new(ErrorCode::Internal, "document path has no parent"))?;
        std::fs::create_dir_all(dir).map_err(io_error)?;
        let content = serde_json::to_string_pretty(doc)
            .map_err(|e| RemoteError::new(ErrorCode::Internal, e.to_string()))?;

        let mut temp_file = NamedTempFile::new_in(dir).map_err(io_error)?;
        use std::io::Write;
        temp_file.write_all(content.as_bytes()).map_err(io_error)?;
        temp_file.as_file().sync_all().map_err(io_error)?;
        temp_file.persist(path).map_err(|e| io_error(e.error))?;
        Ok(())
    }

    pub fn create_blocking(&self, user_id: &str, payload: &ListPayload) -> Result<String, RemoteError> {
        let list_id = self.generate_id();
        let path = self.doc_path(user_id, &list_id)?;
        if path.exists() {
            return Err(RemoteError::new(ErrorCode::AlreadyExists, list_id));
        }
        let payload = normalize_payload(payload);
        let now = StoreTimestamp::now();
        let doc = StoredDocument {
            list_name: payload.list_name,
            values: payload.values,
            created_at: Some(now),
            updated_at: Some(now),
        };
        tracing::info!(user_id, list_id = %list_id, "Creating priority list");
        Self::write_doc(&path, &doc)?;
        Ok(list_id)
    }

    pub fn update_blocking(
        &self,
        user_id: &str,
        list_id: &str,
        payload: &ListPayload,
    ) -> Result<(), RemoteError> {
        let path = self.doc_path(user_id, list_id)?;
        let existing = Self::read_doc(&path)?
            .ok_or_else(|| RemoteError::not_found(format!("list {}", list_id)))?;
        let payload = normalize_payload(payload);
        let doc = StoredDocument {
            list_name: payload.list_name,
            values: payload.values,
            created_at: existing.created_at,
            updated_at: Some(StoreTimestamp::now()),
        };
        tracing::info!(user_id, list_id, "Updating priority list");
        Self::write_doc(&path, &doc)
    }

    pub fn get_blocking(&self, user_id: &str, list_id: &str) -> Result<Option<PriorityList>, RemoteError> {
        let path = self.doc_path(user_id, list_id)?;
        Ok(Self::read_doc(&path)?.map(|doc| doc.into_list(list_id.to_string())))
    }

    pub fn list_blocking(&self, user_id: &str) -> Result<Vec<ListSummary>, RemoteError> {
        let dir = self.lists_dir(user_id)?;
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut lists = Vec::new();
        for entry in std::fs::read_dir(&dir).map_err(io_error)? {
            let path = entry.map_err(io_error)?.path();
            if !path.is_file() || path.extension().map(|e| e != "json").unwrap_or(true) {
                continue;
            }
            let Some(list_id) = path.file_stem().map(|s| s.to_string_lossy().to_string()) else {
                continue;
            };
            match Self::read_doc(&path) {
                Ok(Some(doc)) => lists.push(doc.into_list(list_id).summary()),
                Ok(None) => {}
                Err(e) => tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Skipping unreadable list document"
                ),
            }
        }

        // RFC 3339 strings in UTC with fixed precision sort chronologically
        lists.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(a.id.cmp(&b.id)));
        Ok(lists)
    }

    pub fn delete_blocking(&self, user_id: &str, list_id: &str) -> Result<(), RemoteError> {
        let path = self.doc_path(user_id, list_id)?;
        tracing::info!(user_id, list_id, "Deleting priority list");
        if path.exists() {
            std::fs::remove_file(&path).map_err(io_error)?;
        }
        Ok(())
    }

    async fn run<T, F>(&self, f: F) -> Result<T, RemoteError>
    where
        T: Send + 'static,
        F: FnOnce(DocumentStore) -> Result<T, RemoteError> + Send + 'static,
    {
        let store = self.clone();
        tokio::task::spawn_blocking(move || f(store))
            .await
            .map_err(|e| RemoteError::new(ErrorCode::Internal, format!("task join error: {}", e)))?
    }
}

#[async_trait]
impl RemoteListStore for DocumentStore {
    async fn create(&self, user_id: &str, payload: &ListPayload) -> Result<String, RemoteError> {
        let (user_id, payload) = (user_id.to_string(), payload.clone());
        self.run(move |store| store.create_blocking(&user_id, &payload))
            .await
    }

    async fn update(
        &self,
        user_id: &str,
        list_id: &str,
        payload: &ListPayload,
    ) -> Result<(), RemoteError> {
        let (user_id, list_id, payload) =
            (user_id.to_string(), list_id.to_string(), payload.clone());
        self.run(move |store| store.update_blocking(&user_id, &list_id, &payload))
            .await
    }

    async fn get(&self, user_id: &str, list_id: &str) -> Result<Option<PriorityList>, RemoteError> {
        let (user_id, list_id) = (user_id.to_string(), list_id.to_string());
        self.run(move |store| store.get_blocking(&user_id, &list_id))
            .await
    }

    async fn list(&self, user_id: &str) -> Result<Vec<ListSummary>, RemoteError> {
        let user_id = user_id.to_string();
        self.run(move |store| store.list_blocking(&user_id)).await
    }

    async fn delete(&self, user_id: &str, list_id: &str) -> Result<(), RemoteError> {
        let (user_id, list_id) = (user_id.to_string(), list_id.to_string());
        self.run(move |store| store.delete_blocking(&user_id, &list_id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StoredValue;
    use tempfile::TempDir;

    fn payload(name: &str, contents: &[&str]) -> ListPayload {
        ListPayload::new(
            name,
            ListValues {
                selected_group_values: contents
                    .iter()
                    .enumerate()
                    .map(|(i, c)| StoredValue {
                        content: c.to_string(),
                        id: format!("value-{}", i + 1),
                        is_highlighted: true,
                    })
                    .collect(),
            },
        )
    }

    #[tokio::test]
    async fn test_create_then_get_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = DocumentStore::new(temp_dir.path());

        let id = store
            .create("user-1", &payload("Mine", &["Love", "Joy"]))
            .await
            .unwrap();
        assert_eq!(id.len(), 20);
        assert!(
            temp_dir
                .path()
                .join(format!("users/user-1/priorityLists/{}.json", id))
                .exists()
        );

        let list = store.get("user-1", &id).await.unwrap().unwrap();
        assert_eq!(list.list_name, "Mine");
        assert_eq!(list.values.contents(), vec!["Love", "Joy"]);
        assert!(DateTime::parse_from_rfc3339(&list.created_at).is_ok());
        assert!(list.created_at.ends_with('Z'));
    }

    #[tokio::test]
    async fn test_update_keeps_created_at() {
        let temp_dir = TempDir::new().unwrap();
        let store = DocumentStore::new(temp_dir.path());
        let id = store.create("u", &payload("A", &["Love"])).await.unwrap();
        let before = store.get("u", &id).await.unwrap().unwrap();

        store
            .update("u", &id, &payload("B", &["Joy", "Love"]))
            .await
            .unwrap();
        let after = store.get("u", &id).await.unwrap().unwrap();
        assert_eq!(after.list_name, "B");
        assert_eq!(after.created_at, before.created_at);
        assert_eq!(after.values.contents(), vec!["Joy", "Love"]);
    }

    #[tokio::test]
    async fn test_update_missing_list_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let store = DocumentStore::new(temp_dir.path());
        let err = store
            .update("u", "nope", &payload("A", &[]))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_lists_are_scoped_per_user() {
        let temp_dir = TempDir::new().unwrap();
        let store = DocumentStore::new(temp_dir.path());
        let id = store.create("alice", &payload("A", &["Love"])).await.unwrap();

        assert!(store.get("bob", &id).await.unwrap().is_none());
        assert!(store.list("bob").await.unwrap().is_empty());
        assert_eq!(store.list("alice").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_orders_newest_first() {
        let temp_dir = TempDir::new().unwrap();
        let store = DocumentStore::new(temp_dir.path());
        let first = store.create("u", &payload("First", &[])).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = store.create("u", &payload("Second", &[])).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        store.update("u", &first, &payload("First", &["Joy"])).await.unwrap();

        let lists = store.list("u").await.unwrap();
        let ids: Vec<_> = lists.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec![first.as_str(), second.as_str()]);
        assert_eq!(lists[0].value_count, 1);
    }

    #[tokio::test]
    async fn test_delete_removes_document() {
        let temp_dir = TempDir::new().unwrap();
        let store = DocumentStore::new(temp_dir.path());
        let id = store.create("u", &payload("A", &[])).await.unwrap();
        store.delete("u", &id).await.unwrap();
        assert!(store.get("u", &id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_payload_is_normalized() {
        let temp_dir = TempDir::new().unwrap();
        let store = DocumentStore::new(temp_dir.path());
        let mut p = payload("  ", &["Love"]);
        p.values.selected_group_values[0].id.clear();

        let id = store.create("u", &p).await.unwrap();
        let list = store.get("u", &id).await.unwrap().unwrap();
        assert_eq!(list.list_name, UNTITLED_LIST);
        let value_id = &list.values.selected_group_values[0].id;
        assert!(value_id.starts_with("value-") && value_id.len() == 13);
    }

    #[tokio::test]
    async fn test_path_traversal_is_invalid_argument() {
        let temp_dir = TempDir::new().unwrap();
        let store = DocumentStore::new(temp_dir.path());
        let err = store.get("../etc", "x").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidArgument);
    }

    #[test]
    fn test_legacy_document_without_timestamps() {
        let temp_dir = TempDir::new().unwrap();
        let store = DocumentStore::new(temp_dir.path());
        let dir = temp_dir.path().join("users/u/priorityLists");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("old.json"),
            r#"{"values":{"column4":{"values":[{"content":"Family","id":"value-41","isHighlighted":true}]}}}"#,
        )
        .unwrap();

        let list = store.get_blocking("u", "old").unwrap().unwrap();
        assert_eq!(list.list_name, UNTITLED_LIST);
        assert_eq!(list.values.contents(), vec!["Family"]);
        assert!(DateTime::parse_from_rfc3339(&list.updated_at).is_ok());
    }

    #[test]
    fn test_timestamp_normalization() {
        let ts = StoreTimestamp {
            seconds: 1_700_000_000,
            nanoseconds: 123_000_000,
        };
        assert_eq!(ts.to_iso8601(), "2023-11-14T22:13:20.123Z");
    }
}
