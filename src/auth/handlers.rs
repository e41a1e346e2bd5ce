use axum::{extract::State, routing::get, Router};
use tracing::instrument;

use crate::{
    auth::{dto::PublicMember, extractors::AuthUser, repo::require_member},
    error::AppResult,
    response::ApiResponse,
    state::AppState,
};

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(member_id): AuthUser,
) -> AppResult<ApiResponse<PublicMember>> {
    let member = require_member(state.store.as_ref(), member_id).await?;
    Ok(ApiResponse::success(PublicMember::from(member), "member loaded"))
}
