//! In-process stand-in for the speech service, used by tests.

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::domain::config::ApiConfig;

use super::api_client::ApiClient;
use super::auth_context::AuthContext;
use super::token_store::MemoryTokenStore;

/// Token issued by the mock login.
pub const TOKEN: &str = "tok-1";

/// Request bodies received by the mock.
#[derive(Default)]
pub struct Recorded {
    /// Bodies of profile updates and speech creations.
    pub bodies: Mutex<Vec<Value>>,
    /// `(id, body)` of every speech replacement.
    pub updates: Mutex<Vec<(String, Value)>>,
}

pub type Shared = Arc<Recorded>;

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        == Some("Bearer tok-1")
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["email"] == "ana@example.com" && body["password"] == "Secret#123" {
        Json(json!({ "token": TOKEN })).into_response()
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({ "message": "bad" }))).into_response()
    }
}

async fn register(Json(body): Json<Value>) -> Response {
    if body["email"] == "taken@example.com" {
        StatusCode::CONFLICT.into_response()
    } else {
        StatusCode::CREATED.into_response()
    }
}

async fn me(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!({ "name": "Ana", "email": "ana@example.com" })).into_response()
}

async fn update_me(
    State(recorded): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    recorded.bodies.lock().unwrap().push(body);
    StatusCode::OK.into_response()
}

async fn list(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!([
        { "id": 1, "title": "Toast", "content": "<p>Cheers</p>" },
        { "id": "b2", "title": "Eulogy", "content": "<p>Farewell</p>" }
    ]))
    .into_response()
}

async fn create(
    State(recorded): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    recorded.bodies.lock().unwrap().push(body.clone());
    if body["title"] == "Draft only" {
        return (StatusCode::CREATED, "created").into_response();
    }
    (
        StatusCode::CREATED,
        Json(json!({ "id": 7, "title": body["title"], "content": body["content"] })),
    )
        .into_response()
}

async fn speech(headers: HeaderMap, Path(id): Path<String>) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if id == "missing" {
        return StatusCode::NOT_FOUND.into_response();
    }
    Json(json!({ "id": id, "title": "Toast", "content": "<p>Cheers</p>" })).into_response()
}

async fn replace_speech(
    State(recorded): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if id == "missing" {
        return StatusCode::NOT_FOUND.into_response();
    }
    recorded.updates.lock().unwrap().push((id, body));
    StatusCode::NO_CONTENT.into_response()
}

async fn delete_speech(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "message": "database unavailable" })),
    )
        .into_response()
}

/// Serve the mock on an ephemeral port. Returns its base URL (with a
/// trailing slash) and the recorded request bodies.
pub async fn spawn_api() -> (String, Shared) {
    let recorded = Shared::default();
    let router = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/users/me", get(me).put(update_me))
        .route("/api/speeches", get(list).post(create))
        .route(
            "/api/speeches/{id}",
            get(speech).put(replace_speech).delete(delete_speech),
        )
        .with_state(Arc::clone(&recorded));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (format!("http://{addr}/"), recorded)
}

/// Client for `base_url`, optionally already holding a token.
pub fn client(base_url: &str, token: Option<&str>) -> ApiClient {
    let store = match token {
        Some(token) => MemoryTokenStore::with_token(token),
        None => MemoryTokenStore::default(),
    };
    let auth = Arc::new(AuthContext::load(Box::new(store)).unwrap());
    let config = ApiConfig {
        base_url: base_url.to_string(),
        timeout_secs: 5,
    };
    ApiClient::new(&config, auth).unwrap()
}
