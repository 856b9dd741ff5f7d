//! HTTP API exposing list, item, sharing and auth endpoints.

mod auth;
mod error;
mod lists;
mod share;

pub use error::ApiError;

use axum::{
    extract::{FromRequestParts, Request},
    http::{header, request::Parts, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use list_hub_core::auth::{Hs256Tokens, IdentityService};
use list_hub_core::service::ListService;
use list_hub_core::storage::Database;
use serde_json::json;
use std::any::Any;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use uuid::Uuid;

/// Cookie carrying the access token for browser clients.
pub const TOKEN_COOKIE: &str = "jwt";

/// Caller identity, taken from a verified access token.
#[derive(Clone, Copy, Debug)]
pub struct AuthContext {
    pub user_id: Uuid,
}

impl FromRequestParts<AppState> for AuthContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).or_else(|| cookie_token(parts));
        let Some(token) = token else {
            return Err(ApiError::unauthorized());
        };
        let user_id = state.identity.authenticate(&token).await.map_err(|e| {
            tracing::debug!(error = %e, "rejected access token");
            ApiError::from(e)
        })?;
        Ok(Self { user_id })
    }
}

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
}

fn cookie_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == TOKEN_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub lists: ListService,
    pub identity: Arc<IdentityService>,
}

impl AppState {
    pub fn new(db: &Database, tokens: Arc<Hs256Tokens>) -> Self {
        Self {
            lists: ListService::from_database(db),
            identity: Arc::new(IdentityService::new(db.user_store(), tokens)),
        }
    }
}

pub fn router(state: AppState, request_timeout: Duration) -> Router {
    let routes = Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/lists", get(lists::list_lists).post(lists::create_list))
        .route("/api/lists/{id}", delete(lists::delete_list))
        .route("/api/lists/checkout/{id}", post(lists::checkout_list))
        .route("/api/lists/bulk", post(lists::bulk_create))
        .route("/api/lists/items", post(lists::add_item))
        .route(
            "/api/lists/items/{id}",
            delete(lists::remove_item).put(lists::modify_item),
        )
        .route("/api/share-lists", get(share::list_invites))
        .route("/api/share-lists/create", post(share::create_invite))
        .route("/api/share-lists/respond", post(share::respond))
        .route("/health", get(|| async { "OK" }))
        .with_state(state);
    with_middleware(routes, request_timeout)
}

fn request_id_header() -> HeaderName {
    HeaderName::from_static("x-request-id")
}

#[derive(Clone, Default)]
struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _req: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        Some(RequestId::new(id.parse().ok()?))
    }
}

fn panic_response(_panic: Box<dyn Any + Send + 'static>) -> Response {
    tracing::error!("handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error" })),
    )
        .into_response()
}

/// Outermost first: request id, trace span, id propagation, panic recovery,
/// timeout.
fn with_middleware(routes: Router, request_timeout: Duration) -> Router {
    routes
        .layer(TimeoutLayer::new(request_timeout))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(PropagateRequestIdLayer::new(request_id_header()))
        .layer(TraceLayer::new_for_http().make_span_with(|req: &Request| {
            let rid = req
                .headers()
                .get(request_id_header())
                .and_then(|v| v.to_str().ok())
                .unwrap_or("n/a");
            tracing::info_span!(
                "http_request",
                method = %req.method(),
                uri = %req.uri().path(),
                request_id = %rid,
            )
        }))
        .layer(SetRequestIdLayer::new(request_id_header(), MakeRequestUuid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{self, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    fn app() -> Router {
        let db = Database::in_memory();
        let tokens = Arc::new(Hs256Tokens::new("secret"));
        router(AppState::new(&db, tokens), Duration::from_secs(60))
    }

    async fn call(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(t) = token {
            builder = builder.header("Authorization", format!("Bearer {t}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn login(app: &Router, name: &str) -> String {
        let creds = json!({ "username": name, "password": "pw" });
        let (status, _) = call(app, post_json("/api/auth/register", None, creds.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, body) = call(app, post_json("/api/auth/login", None, creds)).await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn requires_token() {
        let app = app();
        let req = Request::builder()
            .uri("/api/lists")
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(&app, req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": "Unauthorized" }));

        let req = Request::builder()
            .uri("/api/lists")
            .header("Authorization", "Bearer not-a-token")
            .body(Body::empty())
            .unwrap();
        assert_eq!(call(&app, req).await.0, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn cookie_is_accepted() {
        let app = app();
        let token = login(&app, "alice").await;
        let req = Request::builder()
            .uri("/api/lists")
            .header("Cookie", format!("theme=dark; jwt={token}"))
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    async fn explode() -> &'static str {
        panic!("handler failure")
    }

    #[tokio::test]
    async fn panics_become_500_with_request_id() {
        let app = with_middleware(
            Router::new().route("/explode", get(explode)),
            Duration::from_secs(60),
        );
        let resp = app
            .oneshot(Request::builder().uri("/explode").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(resp.headers().contains_key("x-request-id"));
        let bytes = body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value, json!({ "error": "Internal server error" }));
    }

    #[tokio::test]
    async fn caller_request_id_is_echoed() {
        let app = app();
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("x-request-id", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.headers()["x-request-id"], "abc-123");
    }

    #[tokio::test]
    async fn logout_clears_cookie() {
        let app = app();
        let token = login(&app, "alice").await;
        let resp = app
            .clone()
            .oneshot(post_json("/api/auth/logout", Some(&token), json!({})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let cookie = resp.headers()["set-cookie"].to_str().unwrap();
        assert!(cookie.starts_with("jwt=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn list_crud() {
        let app = app();
        let token = login(&app, "alice").await;

        let (status, created) = call(
            &app,
            post_json("/api/lists", Some(&token), json!({ "name": "Groceries" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["name"], "Groceries");
        let list_id = created["id"].as_str().unwrap().to_string();

        let (status, item) = call(
            &app,
            post_json(
                "/api/lists/items",
                Some(&token),
                json!({ "name": "Milk", "listId": list_id }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(item["isCompleted"], false);
        let item_id = item["id"].as_str().unwrap().to_string();

        let req = Request::builder()
            .method("PUT")
            .uri(format!("/api/lists/items/{item_id}"))
            .header("Authorization", format!("Bearer {token}"))
            .header("content-type", "application/json")
            .body(Body::from(
                json!({ "name": "Oat milk", "isCompleted": true }).to_string(),
            ))
            .unwrap();
        assert_eq!(call(&app, req).await.0, StatusCode::OK);

        let (status, _) = call(
            &app,
            post_json(&format!("/api/lists/checkout/{list_id}"), Some(&token), json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let req = Request::builder()
            .uri("/api/lists")
            .header("Authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let (_, lists) = call(&app, req).await;
        assert_eq!(lists[0]["items"], json!([]));
        assert_eq!(lists[0]["ownerName"], "alice");

        let req = Request::builder()
            .method("DELETE")
            .uri(format!("/api/lists/{list_id}"))
            .header("Authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        assert_eq!(call(&app, req).await.0, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn bad_input_is_400() {
        let app = app();
        let token = login(&app, "alice").await;
        let req = Request::builder()
            .method("POST")
            .uri("/api/lists")
            .header("Authorization", format!("Bearer {token}"))
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        assert_eq!(call(&app, req).await.0, StatusCode::BAD_REQUEST);

        let (status, _) = call(
            &app,
            post_json(
                "/api/lists/items",
                Some(&token),
                json!({ "name": "Milk", "listId": "nope" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let req = Request::builder()
            .method("DELETE")
            .uri("/api/lists/not-a-uuid")
            .header("Authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn modify_item_requires_every_field() {
        let app = app();
        let token = login(&app, "alice").await;
        let (_, created) = call(
            &app,
            post_json("/api/lists", Some(&token), json!({ "name": "Groceries" })),
        )
        .await;
        let (_, item) = call(
            &app,
            post_json(
                "/api/lists/items",
                Some(&token),
                json!({ "name": "Milk", "listId": created["id"] }),
            ),
        )
        .await;
        let item_uri = format!("/api/lists/items/{}", item["id"].as_str().unwrap());

        let put = |body: Value| {
            Request::builder()
                .method("PUT")
                .uri(&item_uri)
                .header("Authorization", format!("Bearer {token}"))
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap()
        };
        assert_eq!(
            call(&app, put(json!({ "name": "Milk", "isCompleted": true }))).await.0,
            StatusCode::OK
        );
        let (status, body) = call(&app, put(json!({ "name": "Oat milk" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let req = Request::builder()
            .uri("/api/lists")
            .header("Authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let (_, lists) = call(&app, req).await;
        assert_eq!(lists[0]["items"][0]["name"], "Milk");
        assert_eq!(lists[0]["items"][0]["isCompleted"], true);
    }

    #[tokio::test]
    async fn duplicate_registration_conflicts() {
        let app = app();
        login(&app, "alice").await;
        let (status, body) = call(
            &app,
            post_json(
                "/api/auth/register",
                None,
                json!({ "username": "alice", "password": "x" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "Username already in use");
    }

    #[tokio::test]
    async fn sharing_over_http() {
        let app = app();
        let alice = login(&app, "alice").await;
        let bob = login(&app, "bob").await;

        let (_, created) = call(
            &app,
            post_json("/api/lists", Some(&alice), json!({ "name": "Groceries" })),
        )
        .await;
        let list_id = created["id"].as_str().unwrap().to_string();

        let (status, _) = call(
            &app,
            post_json(
                "/api/share-lists/create",
                Some(&alice),
                json!({ "listId": list_id, "userName": "bob" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let req = Request::builder()
            .uri("/api/share-lists")
            .header("Authorization", format!("Bearer {bob}"))
            .body(Body::empty())
            .unwrap();
        let (_, invites) = call(&app, req).await;
        assert_eq!(invites.as_array().unwrap().len(), 1);

        let respond = json!({ "listId": list_id, "isAccepting": true });
        let (status, _) = call(
            &app,
            post_json("/api/share-lists/respond", Some(&bob), respond.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = call(
            &app,
            post_json("/api/share-lists/respond", Some(&bob), respond),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let req = Request::builder()
            .uri("/api/lists")
            .header("Authorization", format!("Bearer {alice}"))
            .body(Body::empty())
            .unwrap();
        let (_, lists) = call(&app, req).await;
        assert_eq!(lists[0]["sharingNames"], json!(["bob"]));
    }
}
