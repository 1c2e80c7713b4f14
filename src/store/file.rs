use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::Context;
use axum::async_trait;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use super::{CreateUserError, User, UserStore};

/// On-disk document: `{"users": [...]}`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct UsersFile {
    #[serde(default)]
    users: Vec<User>,
}

/// Flat-file account store. Every lookup reads the whole document; every
/// create rewrites it. Creates hold `write_lock` across the
/// check-then-write so concurrent signups cannot both pass the uniqueness
/// check.
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    async fn read_users(&self) -> anyhow::Result<Vec<User>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => {
                let parsed: UsersFile = serde_json::from_slice(&bytes)
                    .with_context(|| format!("parse {}", self.path.display()))?;
                Ok(parsed.users)
            }
            // Missing file == nobody has signed up yet.
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(err).with_context(|| format!("read {}", self.path.display())),
        }
    }

    async fn write_users(&self, users: Vec<User>) -> anyhow::Result<()> {
        let bytes = serde_json::to_vec_pretty(&UsersFile { users }).context("encode users")?;
        tokio::fs::write(&self.path, bytes)
            .await
            .with_context(|| format!("write {}", self.path.display()))
    }
}

#[async_trait]
impl UserStore for FileStore {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let users = self.read_users().await?;
        Ok(users.into_iter().find(|u| u.id == id))
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let email = email.to_lowercase();
        let users = self.read_users().await?;
        Ok(users.into_iter().find(|u| u.email == email))
    }

    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let username = username.to_lowercase();
        let users = self.read_users().await?;
        Ok(users.into_iter().find(|u| u.username == username))
    }

    async fn find_by_email_or_username(&self, value: &str) -> anyhow::Result<Option<User>> {
        let value = value.to_lowercase();
        let users = self.read_users().await?;
        Ok(users
            .into_iter()
            .find(|u| u.email == value || u.username == value))
    }

    async fn create(
        &self,
        email: &str,
        username: &str,
        password_hash: &str,
    ) -> Result<User, CreateUserError> {
        let email = email.trim().to_lowercase();
        let username = username.trim().to_lowercase();

        let _guard = self.write_lock.lock().await;

        let mut users = self.read_users().await.map_err(CreateUserError::Store)?;
        if users.iter().any(|u| u.email == email) {
            return Err(CreateUserError::EmailTaken);
        }
        if users.iter().any(|u| u.username == username) {
            return Err(CreateUserError::UsernameTaken);
        }

        let user = User {
            id: Uuid::new_v4(),
            email,
            username,
            password_hash: password_hash.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        users.push(user.clone());
        self.write_users(users).await.map_err(CreateUserError::Store)?;

        debug!(user_id = %user.id, username = %user.username, "user record written");
        Ok(user)
    }
}
