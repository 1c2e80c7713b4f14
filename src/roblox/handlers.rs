use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{error::AppError, roblox::dto::LookupResponse, state::AppState};

pub fn lookup_routes() -> Router<AppState> {
    Router::new().route("/:username", get(lookup))
}

#[instrument(skip(state))]
pub async fn lookup(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<LookupResponse>, AppError> {
    let profile = state.roblox.lookup(&username).await?;
    Ok(Json(LookupResponse {
        status: true,
        result: profile,
    }))
}
