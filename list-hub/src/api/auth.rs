use super::{ApiError, AppState, AuthContext, TOKEN_COOKIE};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

/// Browser cookie lifetime. Outlives the token it carries; an expired token
/// in a live cookie is rejected like any other.
const COOKIE_MAX_AGE_SECS: u64 = 24 * 60 * 60;

#[derive(Deserialize)]
pub(super) struct Credentials {
    username: String,
    password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    username: String,
    user_id: Uuid,
    token: String,
}

fn cookie_header(value: &str, max_age: u64) -> Result<HeaderMap, ApiError> {
    let cookie = format!("{TOKEN_COOKIE}={value}; Max-Age={max_age}; Path=/; HttpOnly");
    let value = HeaderValue::from_str(&cookie)
        .map_err(|e| ApiError::Hub(anyhow::Error::from(e).into()))?;
    let mut headers = HeaderMap::new();
    headers.insert(header::SET_COOKIE, value);
    Ok(headers)
}

pub(super) async fn register(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(creds) = payload?;
    let id = state.identity.register(&creds.username, &creds.password).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

pub(super) async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(creds) = payload?;
    let session = state.identity.login(&creds.username, &creds.password).await?;
    let headers = cookie_header(&session.token, COOKIE_MAX_AGE_SECS)?;
    Ok((
        headers,
        Json(LoginResponse {
            username: session.username,
            user_id: session.user_id,
            token: session.token,
        }),
    ))
}

/// Tokens are stateless; logging out only clears the cookie.
pub(super) async fn logout(auth: AuthContext) -> Result<impl IntoResponse, ApiError> {
    tracing::debug!(user = %auth.user_id, "logout");
    Ok((cookie_header("", 0)?, StatusCode::OK))
}
