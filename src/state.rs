use std::sync::Arc;

use crate::config::AppConfig;
use crate::roblox::RobloxClient;
use crate::auth::session::SessionStore;
use crate::store::{FileStore, UserStore};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub sessions: SessionStore,
    pub roblox: RobloxClient,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let users = Arc::new(FileStore::new(config.users_file.clone())) as Arc<dyn UserStore>;
        let sessions = SessionStore::new(&config.session.secret, config.session.ttl_days);
        let roblox = RobloxClient::new(config.stalk_api_url.clone())?;
        Ok(Self::from_parts(users, sessions, roblox, config))
    }

    pub fn from_parts(
        users: Arc<dyn UserStore>,
        sessions: SessionStore,
        roblox: RobloxClient,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            users,
            sessions,
            roblox,
            config,
        }
    }

    /// Self-contained state for tests: throwaway users file, fixed secret,
    /// unroutable upstream.
    pub fn fake() -> Self {
        use crate::config::SessionConfig;

        let users_file =
            std::env::temp_dir().join(format!("rostalk-test-{}.json", uuid::Uuid::new_v4()));
        let config = Arc::new(AppConfig {
            session: SessionConfig {
                secret: "test-secret".into(),
                ttl_days: 7,
            },
            users_file: users_file.clone(),
            stalk_api_url: "http://127.0.0.1:9/api/stalk/roblox".into(),
            production: false,
        });

        Self::from_parts(
            Arc::new(FileStore::new(users_file)),
            SessionStore::new("test-secret", 7),
            RobloxClient::new(config.stalk_api_url.clone()).expect("client from static config"),
            config,
        )
    }
}
