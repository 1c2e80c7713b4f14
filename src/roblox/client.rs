use anyhow::Context;
use reqwest::{header, Client};
use tracing::{instrument, warn};

use crate::error::AppError;
use crate::roblox::dto::{RobloxProfile, StalkEnvelope};

static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Client for the third-party profile stalk API. One GET per lookup, no
/// retries; transport defaults apply.
#[derive(Clone)]
pub struct RobloxClient {
    http: Client,
    endpoint: String,
}

impl RobloxClient {
    pub fn new(endpoint: impl Into<String>) -> anyhow::Result<Self> {
        let http = Client::builder()
            .user_agent(APP_USER_AGENT)
            .build()
            .context("build stalk api client")?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    /// Looks up a profile by username and reshapes the upstream response
    /// into the internal contract.
    #[instrument(skip(self))]
    pub async fn lookup(&self, username: &str) -> Result<RobloxProfile, AppError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AppError::InvalidInput("Username is required".into()));
        }

        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("user", username)])
            .header(header::ACCEPT, "*/*")
            .send()
            .await
            .map_err(|err| {
                AppError::Internal(anyhow::Error::new(err).context("stalk api request failed"))
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "stalk api returned an error status");
            return Err(AppError::Upstream(status));
        }

        let body = response.text().await.map_err(|err| {
            AppError::Internal(anyhow::Error::new(err).context("read stalk api response"))
        })?;

        // One strict deserialize covers both "not JSON" and "JSON of the
        // wrong shape"; a miss still has to parse cleanly.
        let envelope: StalkEnvelope =
            serde_json::from_str(&body).map_err(AppError::UpstreamFormat)?;

        match envelope.data {
            Some(data) if envelope.status => Ok(RobloxProfile::from(data)),
            _ => Err(AppError::NotFound),
        }
    }
}
