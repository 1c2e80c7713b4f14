use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use lazy_static::lazy_static;
use regex::Regex;
use time::Duration;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, SignupRequest, StatusResponse},
        extractors::CurrentUser,
        password,
        session::SESSION_COOKIE,
    },
    error::AppError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(me))
}

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn session_cookie(state: &AppState, value: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .secure(state.config.production)
        .max_age(Duration::days(state.config.session.ttl_days))
        .build()
}

#[instrument(skip(state, jar, payload))]
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(mut payload): Json<SignupRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    payload.email = payload.email.trim().to_lowercase();
    payload.username = payload.username.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "signup rejected: invalid email");
        return Err(AppError::InvalidInput("Invalid email".into()));
    }
    if payload.username.is_empty() {
        return Err(AppError::InvalidInput("Username is required".into()));
    }
    if payload.password.len() < 8 {
        warn!("signup rejected: password too short");
        return Err(AppError::InvalidInput("Password too short".into()));
    }

    let hash = password::hash_password(&payload.password)?;
    let user = state
        .users
        .create(&payload.email, &payload.username, &hash)
        .await?;

    let cookie = session_cookie(&state, state.sessions.create(user.id).await);

    info!(user_id = %user.id, username = %user.username, "account created");
    Ok((
        jar.add(cookie),
        Json(AuthResponse {
            status: true,
            user: user.into(),
        }),
    ))
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    let lookup = payload.email_or_username.trim().to_lowercase();
    if lookup.is_empty() {
        return Err(AppError::InvalidInput("Email or username is required".into()));
    }
    if payload.password.is_empty() {
        return Err(AppError::InvalidInput("Password is required".into()));
    }

    // Unknown account and wrong password answer identically so the endpoint
    // cannot be used to enumerate accounts.
    let user = state
        .users
        .find_by_email_or_username(&lookup)
        .await?
        .ok_or_else(|| {
            warn!(account = %lookup, "login: unknown account");
            AppError::Unauthorized("Invalid credentials")
        })?;

    if !password::verify_password(&payload.password, &user.password_hash) {
        warn!(user_id = %user.id, "login: invalid password");
        return Err(AppError::Unauthorized("Invalid credentials"));
    }

    let cookie = session_cookie(&state, state.sessions.create(user.id).await);

    info!(user_id = %user.id, username = %user.username, "user logged in");
    Ok((
        jar.add(cookie),
        Json(AuthResponse {
            status: true,
            user: user.into(),
        }),
    ))
}

#[instrument(skip(state, jar))]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<StatusResponse>) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.sessions.destroy(cookie.value()).await;
    }

    let removal = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    (jar.remove(removal), Json(StatusResponse { status: true }))
}

#[instrument(skip(state))]
pub async fn me(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<AuthResponse>, AppError> {
    let user = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or(AppError::Unauthorized("User not found"))?;

    Ok(Json(AuthResponse {
        status: true,
        user: user.into(),
    }))
}
