use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::User;

/// Request body for signup.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

/// Request body for login. One field carries either identifier.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email_or_username: String,
    pub password: String,
}

/// Account summary returned to the client. Never carries the hash.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub username: String,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
        }
    }
}

/// Response for signup, login and me.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub status: bool,
    pub user: PublicUser,
}

/// Bare `{status: true}` envelope (logout).
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: bool,
}
