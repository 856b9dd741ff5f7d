use super::{ApiError, AppState, AuthContext};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use list_hub_core::service::{ListView, NewList};
use list_hub_core::storage::model::Item;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Deserialize)]
pub(super) struct CreateListRequest {
    name: String,
}

#[derive(Serialize)]
struct CreatedList {
    name: String,
    id: Uuid,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AddItemRequest {
    name: String,
    list_id: Uuid,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ModifyItemRequest {
    name: String,
    is_completed: bool,
}

pub(super) async fn list_lists(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Vec<ListView>>, ApiError> {
    Ok(Json(state.lists.list_lists(auth.user_id).await?))
}

pub(super) async fn create_list(
    State(state): State<AppState>,
    auth: AuthContext,
    payload: Result<Json<CreateListRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let id = state.lists.create_list(auth.user_id, &req.name).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedList {
            name: req.name.trim().to_string(),
            id,
        }),
    ))
}

pub(super) async fn delete_list(
    State(state): State<AppState>,
    auth: AuthContext,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    state.lists.delete_list(id, auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Authentication is required, but any authenticated caller may check out
/// any list by id.
pub(super) async fn checkout_list(
    State(state): State<AppState>,
    _auth: AuthContext,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    state.lists.checkout_list(id).await?;
    Ok(StatusCode::OK)
}

#[derive(Serialize)]
struct BulkCreated {
    ids: Vec<Uuid>,
}

pub(super) async fn bulk_create(
    State(state): State<AppState>,
    auth: AuthContext,
    payload: Result<Json<Vec<NewList>>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(lists) = payload?;
    let ids = state.lists.bulk_create_lists(lists, auth.user_id).await?;
    Ok((StatusCode::CREATED, Json(BulkCreated { ids })))
}

pub(super) async fn add_item(
    State(state): State<AppState>,
    auth: AuthContext,
    payload: Result<Json<AddItemRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let item = state
        .lists
        .add_item(&req.name, auth.user_id, req.list_id)
        .await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub(super) async fn remove_item(
    State(state): State<AppState>,
    auth: AuthContext,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    state.lists.remove_item(id, auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn modify_item(
    State(state): State<AppState>,
    auth: AuthContext,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<ModifyItemRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    let Json(req) = payload?;
    let item = Item {
        id,
        name: req.name,
        is_completed: req.is_completed,
    };
    state.lists.modify_item(auth.user_id, item).await?;
    Ok(StatusCode::OK)
}
