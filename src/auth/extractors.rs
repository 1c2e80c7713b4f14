use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;
use uuid::Uuid;

use crate::{auth::session::SESSION_COOKIE, error::AppError, state::AppState};

/// Resolves the session cookie to the logged-in user's id.
#[derive(Debug)]
pub struct CurrentUser(pub Uuid);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_request_parts(parts, state)
            .await
            .map_err(|err| -> AppError { match err {} })?;

        let cookie = jar
            .get(SESSION_COOKIE)
            .ok_or(AppError::Unauthorized("Not authenticated"))?;

        let user_id = state.sessions.resolve(cookie.value()).await.ok_or_else(|| {
            debug!("session cookie did not resolve");
            AppError::Unauthorized("Not authenticated")
        })?;

        Ok(CurrentUser(user_id))
    }
}
