use axum::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

mod file;

pub use file::FileStore;

/// Registered account record as persisted on disk. Never serialized into an
/// API response directly; handlers go through `PublicUser`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Error)]
pub enum CreateUserError {
    #[error("Email already registered")]
    EmailTaken,

    #[error("Username already taken")]
    UsernameTaken,

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Account lookup and creation. Held as `Arc<dyn UserStore>` in `AppState`
/// so tests can swap in fakes.
///
/// Email and username are matched case-insensitively; implementations
/// normalize both to lowercase before storing.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;

    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>>;

    /// Single-field login lookup: the value is matched against both email
    /// and username.
    async fn find_by_email_or_username(&self, value: &str) -> anyhow::Result<Option<User>>;

    /// Creates an account with an already-hashed password. Fails with a
    /// typed error if the email or username is taken.
    async fn create(
        &self,
        email: &str,
        username: &str,
        password_hash: &str,
    ) -> Result<User, CreateUserError>;
}
