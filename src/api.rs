//! HTTP API
//!
//! Thin axum binding: one route per store operation, no logic of its own.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use scribe_core::{ContentStore, ErrorKind, FieldUpdate, Post, PostPatch, RestoreRecord, StoreError};
use serde::Deserialize;
use serde_json::{json, Value};

// =============================================================================
// Request Types
// =============================================================================

/// Body of `POST /api/blog/`.
#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub summary: String,
    pub content: String,
}

/// Body of `PUT /api/blog/{slug}`. Absent fields are left untouched;
/// `"tags": null` clears the tags.
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    #[serde(default, deserialize_with = "deserialize_field_update")]
    pub tags: FieldUpdate<Vec<String>>,
    pub published: Option<bool>,
}

/// Present-but-null becomes `Clear`; a missing key keeps the serde default.
fn deserialize_field_update<'de, D>(deserializer: D) -> Result<FieldUpdate<Vec<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Option::<Vec<String>>::deserialize(deserializer)? {
        Some(tags) => FieldUpdate::Set(tags),
        None => FieldUpdate::Clear,
    })
}

impl From<UpdatePostRequest> for PostPatch {
    fn from(req: UpdatePostRequest) -> Self {
        Self {
            title: req.title,
            summary: req.summary,
            content: req.content,
            tags: req.tags,
            published: req.published,
        }
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Store error rendered as an HTTP response.
pub struct ApiError(StoreError);

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        Self(e)
    }
}

/// Undecodable bodies are caller errors like any other validation failure.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(StoreError::validation(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Unavailable => {
                tracing::error!(error = %self.0, "Storage unavailable");
                StatusCode::SERVICE_UNAVAILABLE
            }
        };
        (status, Json(json!({ "detail": self.0.to_string() }))).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// Router
// =============================================================================

/// Build the router over a shared store.
pub fn router(store: ContentStore) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/blog/", get(list_posts).post(create_post))
        .route("/api/blog/backup", get(backup_posts))
        .route("/api/blog/restore", post(restore_posts))
        .route(
            "/api/blog/:slug",
            get(get_post).put(update_post).delete(delete_post),
        )
        .with_state(store)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn list_posts(State(store): State<ContentStore>) -> ApiResult<Json<Vec<Post>>> {
    Ok(Json(store.list().await?))
}

async fn get_post(
    State(store): State<ContentStore>,
    Path(slug): Path<String>,
) -> ApiResult<Json<Post>> {
    Ok(Json(store.read(&slug).await?))
}

async fn create_post(
    State(store): State<ContentStore>,
    req: Result<Json<CreatePostRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Post>)> {
    let Json(req) = req?;
    let post = store.create(&req.title, &req.summary, &req.content).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

async fn update_post(
    State(store): State<ContentStore>,
    Path(slug): Path<String>,
    req: Result<Json<UpdatePostRequest>, JsonRejection>,
) -> ApiResult<Json<Post>> {
    let Json(req) = req?;
    Ok(Json(store.update(&slug, req.into()).await?))
}

async fn delete_post(
    State(store): State<ContentStore>,
    Path(slug): Path<String>,
) -> ApiResult<Json<Value>> {
    store.delete(&slug).await?;
    Ok(Json(json!({ "ok": true })))
}

async fn backup_posts(State(store): State<ContentStore>) -> ApiResult<Json<Vec<Post>>> {
    Ok(Json(store.backup().await?))
}

async fn restore_posts(
    State(store): State<ContentStore>,
    records: Result<Json<Vec<RestoreRecord>>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(records) = records?;
    let count = store.restore(records).await?;
    Ok(Json(json!({ "ok": true, "count": count })))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use scribe_core::FileBackend;
    use std::sync::Arc;
    use tempfile::{tempdir, TempDir};
    use tower::ServiceExt;

    async fn app() -> (Router, TempDir) {
        let dir = tempdir().unwrap();
        let backend = FileBackend::open(dir.path().join("posts.json")).await.unwrap();
        (router(ContentStore::new(Arc::new(backend))), dir)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                req = req.header("content-type", "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let resp = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _dir) = app().await;
        let (status, body) = send(&app, "GET", "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_create_read_conflict() {
        let (app, _dir) = app().await;
        let payload = json!({"title": "Hello, World!", "summary": "s", "content": "c"});

        let (status, body) = send(&app, "POST", "/api/blog/", Some(payload.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["slug"], "hello-world");

        let (status, _) = send(&app, "POST", "/api/blog/", Some(payload)).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = send(&app, "GET", "/api/blog/hello-world", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Hello, World!");
    }

    #[tokio::test]
    async fn test_invalid_title_is_bad_request() {
        let (app, _dir) = app().await;
        let payload = json!({"title": "!!!", "summary": "s", "content": "c"});
        let (status, body) = send(&app, "POST", "/api/blog/", Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().contains("validation"));
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let (app, _dir) = app().await;
        let payload = json!({"title": "Post", "summary": "s", "content": "c"});
        send(&app, "POST", "/api/blog/", Some(payload)).await;

        let (status, body) = send(
            &app,
            "PUT",
            "/api/blog/post",
            Some(json!({"summary": "x", "tags": ["a", "b"]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"], "x");
        assert_eq!(body["content"], "c");
        assert_eq!(body["tags"], json!(["a", "b"]));

        let (_, body) = send(&app, "PUT", "/api/blog/post", Some(json!({"tags": null}))).await;
        assert_eq!(body["tags"], Value::Null);
        assert_eq!(body["summary"], "x");

        let (status, body) = send(&app, "DELETE", "/api/blog/post", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);

        let (status, _) = send(&app, "DELETE", "/api/blog/post", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_backup_and_restore() {
        let (app, _dir) = app().await;
        send(&app, "POST", "/api/blog/", Some(json!({"title": "One", "summary": "s", "content": "c"}))).await;

        let (status, backup) = send(&app, "GET", "/api/blog/backup", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(backup.as_array().unwrap().len(), 1);

        let restore = json!([
            {"slug": "x", "title": "X", "summary": "s", "content": "c"},
            {"slug": "y", "title": "Y", "summary": "s", "content": "c"}
        ]);
        let (status, body) = send(&app, "POST", "/api/blog/restore", Some(restore)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 2);

        let (_, list) = send(&app, "GET", "/api/blog/", None).await;
        let slugs: Vec<&str> = list
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["slug"].as_str().unwrap())
            .collect();
        assert_eq!(slugs, vec!["x", "y"]);

        let bad = json!([{"slug": "z", "title": "Z", "summary": "", "content": "c"}]);
        let (status, _) = send(&app, "POST", "/api/blog/restore", Some(bad)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_body_field_is_bad_request() {
        let (app, _dir) = app().await;
        send(&app, "POST", "/api/blog/", Some(json!({"title": "Kept", "summary": "s", "content": "c"}))).await;

        let missing = json!([{"slug": "z", "title": "Z", "content": "c"}]);
        let (status, body) = send(&app, "POST", "/api/blog/restore", Some(missing)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().contains("summary"));

        let (status, _) = send(&app, "POST", "/api/blog/", Some(json!({"title": "No body"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, list) = send(&app, "GET", "/api/blog/", None).await;
        assert_eq!(list.as_array().unwrap().len(), 1);
    }
}
