use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::extractors::AuthUser,
    error::{AppError, AppResult},
    ingredients::{
        dto::{
            AddIngredientRequest, AutoIngredientResponse, CategoryResponse, FridgeStatusResponse,
            ListTotalMyIngredients, SearchQuery, StorageQuery, StorageResponse,
            TotalIngredientResponse, WarningResponse,
        },
        services,
    },
    response::ApiResponse,
    state::AppState,
};

// --- public routers ---

pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/ingredients/autocomplete", get(autocomplete))
        .route("/ingredients/search", get(search))
}

pub fn my_routes() -> Router<AppState> {
    Router::new()
        .route("/ingredients", get(list_all).post(add_ingredient))
        .route("/ingredients/storage", get(list_by_storage))
        .route("/ingredients/warning", get(warning))
        .route("/ingredients/status", get(fridge_status))
        .route("/ingredients/category", get(category))
        .route("/ingredients/:id", delete(delete_ingredient))
}

// --- handlers ---

#[instrument(skip(state))]
pub async fn autocomplete(
    State(state): State<AppState>,
    Query(q): Query<SearchQuery>,
) -> AppResult<ApiResponse<AutoIngredientResponse>> {
    let res = services::autocomplete(state.store.as_ref(), &q.food_name).await?;
    Ok(ApiResponse::success(res, "autocomplete list loaded"))
}

#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(q): Query<SearchQuery>,
) -> AppResult<ApiResponse<TotalIngredientResponse>> {
    let res = services::search(state.store.as_ref(), &q.food_name).await?;
    Ok(ApiResponse::success(res, "ingredient search succeeded"))
}

#[instrument(skip(state, payload))]
pub async fn add_ingredient(
    State(state): State<AppState>,
    AuthUser(member_id): AuthUser,
    payload: Result<Json<AddIngredientRequest>, JsonRejection>,
) -> AppResult<(StatusCode, ApiResponse<()>)> {
    let Json(req) = payload.map_err(|e| AppError::bad_request(e.body_text()))?;
    services::add_my_ingredient(state.store.as_ref(), member_id, req).await?;
    Ok((StatusCode::CREATED, ApiResponse::ok("ingredient stored")))
}

#[instrument(skip(state))]
pub async fn list_all(
    State(state): State<AppState>,
    AuthUser(member_id): AuthUser,
) -> AppResult<ApiResponse<ListTotalMyIngredients>> {
    let records = services::owned_records(state.store.as_ref(), member_id, None).await?;
    let res = services::total_view(&records, state.config.today());
    Ok(ApiResponse::success(res, "ingredient list loaded"))
}

#[instrument(skip(state))]
pub async fn list_by_storage(
    State(state): State<AppState>,
    AuthUser(member_id): AuthUser,
    Query(q): Query<StorageQuery>,
) -> AppResult<ApiResponse<StorageResponse>> {
    let storage = services::parse_storage_filter(&q.storage)?;
    let records = services::owned_records(state.store.as_ref(), member_id, storage).await?;
    let res = services::storage_view(&records, state.config.today());
    Ok(ApiResponse::success(res, "ingredient list loaded"))
}

#[instrument(skip(state))]
pub async fn warning(
    State(state): State<AppState>,
    AuthUser(member_id): AuthUser,
) -> AppResult<ApiResponse<WarningResponse>> {
    let records = services::owned_records(state.store.as_ref(), member_id, None).await?;
    let res = services::warning_view(&records, state.config.today());
    Ok(ApiResponse::success(res, "warning list loaded"))
}

#[instrument(skip(state))]
pub async fn fridge_status(
    State(state): State<AppState>,
    AuthUser(member_id): AuthUser,
) -> AppResult<ApiResponse<FridgeStatusResponse>> {
    let res = services::fridge_status(state.store.as_ref(), member_id).await?;
    Ok(ApiResponse::success(res, "fridge status loaded"))
}

#[instrument(skip(state))]
pub async fn category(
    State(state): State<AppState>,
    AuthUser(member_id): AuthUser,
) -> AppResult<ApiResponse<CategoryResponse>> {
    let res = services::category_breakdown(state.store.as_ref(), member_id).await?;
    Ok(ApiResponse::success(res, "category breakdown loaded"))
}

#[instrument(skip(state))]
pub async fn delete_ingredient(
    State(state): State<AppState>,
    AuthUser(member_id): AuthUser,
    path: Result<Path<i64>, PathRejection>,
) -> AppResult<ApiResponse<()>> {
    let Path(id) = path.map_err(|e| AppError::bad_request(e.body_text()))?;
    services::delete_my_ingredient(state.store.as_ref(), member_id, id).await?;
    Ok(ApiResponse::ok("ingredient deleted"))
}
