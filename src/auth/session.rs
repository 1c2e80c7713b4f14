use std::collections::HashMap;
use std::sync::Arc;

use base64ct::{Base64UrlUnpadded, Encoding};
use hmac::{Hmac, Mac};
use rand::{rngs::OsRng, RngCore};
use sha2::Sha256;
use time::{Duration, OffsetDateTime};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "sid";

const TOKEN_BYTES: usize = 32;

#[derive(Debug, Clone)]
struct Session {
    user_id: Uuid,
    expires_at: OffsetDateTime,
}

/// In-memory session store keyed by an opaque random token. The cookie
/// value is `token.signature` with an HMAC-SHA256 signature over the token,
/// so forged or truncated cookies are rejected before the map is consulted.
///
/// Sessions live for a fixed window from creation; no sliding renewal.
#[derive(Clone)]
pub struct SessionStore {
    secret: Vec<u8>,
    ttl: Duration,
    inner: Arc<RwLock<HashMap<String, Session>>>,
}

impl SessionStore {
    pub fn new(secret: &str, ttl_days: i64) -> Self {
        Self {
            secret: secret.as_bytes().to_vec(),
            ttl: Duration::days(ttl_days),
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Starts a session for `user_id` and returns the signed cookie value.
    pub async fn create(&self, user_id: Uuid) -> String {
        let mut raw = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut raw);
        let token = Base64UrlUnpadded::encode_string(&raw);

        let session = Session {
            user_id,
            expires_at: OffsetDateTime::now_utc() + self.ttl,
        };
        self.inner.write().await.insert(token.clone(), session);

        let sig = self.sign(&token);
        format!("{token}.{sig}")
    }

    /// Resolves a cookie value to a user id. Bad signatures and unknown
    /// tokens resolve to `None`; expired entries are removed on sight.
    pub async fn resolve(&self, cookie_value: &str) -> Option<Uuid> {
        let token = self.verify(cookie_value)?;

        {
            let sessions = self.inner.read().await;
            let session = sessions.get(token)?;
            if session.expires_at > OffsetDateTime::now_utc() {
                return Some(session.user_id);
            }
        }

        debug!("dropping expired session");
        self.inner.write().await.remove(token);
        None
    }

    /// Ends a session. Idempotent; a bad or unknown cookie is a no-op.
    pub async fn destroy(&self, cookie_value: &str) {
        if let Some(token) = self.verify(cookie_value) {
            self.inner.write().await.remove(token);
        }
    }

    fn sign(&self, token: &str) -> String {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts keys of any length");
        mac.update(token.as_bytes());
        Base64UrlUnpadded::encode_string(&mac.finalize().into_bytes())
    }

    /// Constant-time signature check; returns the bare token on success.
    fn verify<'a>(&self, cookie_value: &'a str) -> Option<&'a str> {
        let (token, sig) = cookie_value.split_once('.')?;
        let sig = Base64UrlUnpadded::decode_vec(sig).ok()?;

        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts keys of any length");
        mac.update(token.as_bytes());
        if mac.verify_slice(&sig).is_err() {
            debug!("session cookie signature mismatch");
            return None;
        }
        Some(token)
    }
}
