use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::extractors::AuthUser,
    classes::{
        dto::{
            ClassList, EnterResponse, MessageRequest, RoomRecipeResponse, RoomRequest,
            SessionRoomResponse,
        },
        repo_types::ChatMessage,
        services,
    },
    error::{AppError, AppResult},
    response::ApiResponse,
    state::AppState,
};

pub fn class_routes() -> Router<AppState> {
    Router::new()
        .route("/class", get(list_classes).post(create_class))
        .route("/class/enter/:class_id", get(enter_class))
        .route("/class/:class_id", get(class_recipe).delete(remove_class))
        .route("/class/:class_id/messages", post(post_message))
}

#[instrument(skip(state))]
pub async fn list_classes(State(state): State<AppState>) -> AppResult<ApiResponse<ClassList>> {
    let res = services::list_rooms(state.store.as_ref()).await?;
    Ok(ApiResponse::success(res, "classes loaded"))
}

#[instrument(skip(state, payload))]
pub async fn create_class(
    State(state): State<AppState>,
    AuthUser(member_id): AuthUser,
    payload: Result<Json<RoomRequest>, JsonRejection>,
) -> AppResult<(StatusCode, ApiResponse<SessionRoomResponse>)> {
    let Json(req) = payload.map_err(|e| AppError::bad_request(e.body_text()))?;
    let res =
        services::create_room(state.store.as_ref(), state.rtc.as_ref(), member_id, req).await?;
    Ok((StatusCode::CREATED, ApiResponse::success(res, "class created")))
}

#[instrument(skip(state))]
pub async fn enter_class(
    State(state): State<AppState>,
    AuthUser(member_id): AuthUser,
    path: Result<Path<i64>, PathRejection>,
) -> AppResult<ApiResponse<EnterResponse>> {
    let Path(class_id) = path.map_err(|e| AppError::bad_request(e.body_text()))?;
    let res =
        services::enter_room(state.store.as_ref(), state.rtc.as_ref(), member_id, class_id).await?;
    Ok(ApiResponse::success(res, "previous chat loaded"))
}

#[instrument(skip(state))]
pub async fn class_recipe(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> AppResult<ApiResponse<RoomRecipeResponse>> {
    let Path(class_id) = path.map_err(|e| AppError::bad_request(e.body_text()))?;
    let res = services::room_recipe(state.store.as_ref(), class_id).await?;
    Ok(ApiResponse::success(res, "recipe loaded"))
}

#[instrument(skip(state))]
pub async fn remove_class(
    State(state): State<AppState>,
    AuthUser(member_id): AuthUser,
    path: Result<Path<i64>, PathRejection>,
) -> AppResult<ApiResponse<()>> {
    let Path(class_id) = path.map_err(|e| AppError::bad_request(e.body_text()))?;
    services::close_room(state.store.as_ref(), state.rtc.as_ref(), member_id, class_id).await?;
    Ok(ApiResponse::ok("class closed"))
}

#[instrument(skip(state, payload))]
pub async fn post_message(
    State(state): State<AppState>,
    AuthUser(member_id): AuthUser,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<MessageRequest>, JsonRejection>,
) -> AppResult<(StatusCode, ApiResponse<ChatMessage>)> {
    let Path(class_id) = path.map_err(|e| AppError::bad_request(e.body_text()))?;
    let Json(req) = payload.map_err(|e| AppError::bad_request(e.body_text()))?;
    let res = services::post_message(state.store.as_ref(), member_id, class_id, req).await?;
    Ok((StatusCode::CREATED, ApiResponse::success(res, "message sent")))
}
