//! Wire contracts for the profile proxy.
//!
//! `StalkEnvelope` mirrors the third-party stalk API response, declaring
//! exactly the fields this service consumes. Deserializing is the
//! validation step: a body that parses is well-formed, everything else is a
//! contract violation. The envelope distinguishes three shapes:
//!
//! - malformed (wrong type, missing required field) — rejected by serde;
//! - well-formed miss (`status: false` or no `data`) — the upstream
//!   understood the request but has no such user;
//! - well-formed but sparse (`avatar`/`achievements` absent) — valid, and
//!   filled with explicit defaults during the transform.

use serde::{Deserialize, Serialize};

/// Simplified profile served to clients. Built fresh on every lookup,
/// never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RobloxProfile {
    pub id: u64,
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    pub created: String,
    pub is_banned: bool,
    pub has_verified_badge: bool,
    pub friends: u64,
    pub followers: u64,
    pub following: u64,
    pub badges: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
}

/// Success envelope for the lookup route.
#[derive(Debug, Serialize)]
pub struct LookupResponse {
    pub status: bool,
    pub result: RobloxProfile,
}

/// Raw upstream response. Unknown fields are ignored; `data` may be absent
/// on a miss.
#[derive(Debug, Deserialize)]
pub struct StalkEnvelope {
    pub status: bool,
    #[serde(default)]
    pub data: Option<StalkData>,
}

#[derive(Debug, Deserialize)]
pub struct StalkData {
    pub basic: StalkBasic,
    pub social: StalkSocial,
    #[serde(default)]
    pub avatar: Option<StalkAvatar>,
    #[serde(default)]
    pub achievements: Option<StalkAchievements>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StalkBasic {
    pub id: u64,
    pub name: String,
    pub display_name: String,
    // Required key, nullable value. `deserialize_with` disables serde's
    // implicit missing-means-None for Option fields.
    #[serde(deserialize_with = "Option::deserialize")]
    pub description: Option<String>,
    pub created: String,
    pub is_banned: bool,
    pub has_verified_badge: bool,
}

#[derive(Debug, Deserialize)]
pub struct StalkSocial {
    pub friends: StalkCount,
    pub followers: StalkCount,
    pub following: StalkCount,
}

#[derive(Debug, Deserialize)]
pub struct StalkCount {
    pub count: u64,
}

#[derive(Debug, Deserialize)]
pub struct StalkAvatar {
    pub headshot: StalkHeadshot,
}

#[derive(Debug, Deserialize)]
pub struct StalkHeadshot {
    pub data: Vec<StalkHeadshotImage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StalkHeadshotImage {
    pub image_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StalkAchievements {
    #[serde(default)]
    pub roblox_badges: Option<Vec<serde_json::Value>>,
}

impl From<StalkData> for RobloxProfile {
    fn from(data: StalkData) -> Self {
        let badges = data
            .achievements
            .and_then(|a| a.roblox_badges)
            .map_or(0, |badges| badges.len());
        let profile_picture = data
            .avatar
            .and_then(|a| a.headshot.data.into_iter().next())
            .map(|image| image.image_url);

        Self {
            id: data.basic.id,
            name: data.basic.name,
            display_name: data.basic.display_name,
            description: data.basic.description,
            created: data.basic.created,
            is_banned: data.basic.is_banned,
            has_verified_badge: data.basic.has_verified_badge,
            friends: data.social.friends.count,
            followers: data.social.followers.count,
            following: data.social.following.count,
            badges,
            profile_picture,
        }
    }
}
