use std::path::PathBuf;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub secret: String,
    pub ttl_days: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub session: SessionConfig,
    pub users_file: PathBuf,
    pub stalk_api_url: String,
    pub production: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let session = SessionConfig {
            secret: std::env::var("SESSION_SECRET").context("SESSION_SECRET must be set")?,
            ttl_days: std::env::var("SESSION_TTL_DAYS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(7),
        };
        let users_file = std::env::var("USERS_FILE")
            .unwrap_or_else(|_| "users.json".into())
            .into();
        let stalk_api_url = std::env::var("ROBLOX_API_URL")
            .unwrap_or_else(|_| "https://api.siputzx.my.id/api/stalk/roblox".into());
        let production = std::env::var("APP_ENV")
            .map(|v| v == "production")
            .unwrap_or(false);

        Ok(Self {
            session,
            users_file,
            stalk_api_url,
            production,
        })
    }
}
