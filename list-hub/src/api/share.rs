use super::{ApiError, AppState, AuthContext};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use list_hub_core::service::ListView;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct InviteRequest {
    list_id: Uuid,
    user_name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RespondRequest {
    list_id: Uuid,
    is_accepting: bool,
}

pub(super) async fn list_invites(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Vec<ListView>>, ApiError> {
    Ok(Json(state.lists.list_invites(auth.user_id).await?))
}

pub(super) async fn create_invite(
    State(state): State<AppState>,
    auth: AuthContext,
    payload: Result<Json<InviteRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let invitee = state
        .lists
        .create_invite(auth.user_id, req.list_id, &req.user_name)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "listId": req.list_id, "userId": invitee })),
    ))
}

pub(super) async fn respond(
    State(state): State<AppState>,
    auth: AuthContext,
    payload: Result<Json<RespondRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(req) = payload?;
    state
        .lists
        .respond_to_invite(req.list_id, auth.user_id, req.is_accepting)
        .await?;
    Ok(StatusCode::OK)
}
