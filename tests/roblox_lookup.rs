//! Fetcher tests against an in-process stand-in for the stalk API.

use std::collections::HashMap;

use axum::{
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;

use rostalk::error::AppError;
use rostalk::roblox::RobloxClient;

fn full_payload() -> serde_json::Value {
    json!({
        "status": true,
        "data": {
            "userId": 156,
            "basic": {
                "id": 156,
                "name": "builderman",
                "displayName": "Builderman",
                "description": "Welcome to Roblox!",
                "created": "2006-02-27T21:06:40.3Z",
                "isBanned": false,
                "hasVerifiedBadge": true
            },
            "social": {
                "friends": { "count": 28 },
                "followers": { "count": 123456 },
                "following": { "count": 0 }
            },
            "avatar": {
                "headshot": {
                    "data": [ { "imageUrl": "https://cdn.example.com/headshot.png" } ]
                }
            },
            "achievements": {
                "robloxBadges": [ { "id": 1 }, { "id": 12 }, { "id": 14 } ]
            }
        }
    })
}

async fn stalk(Query(params): Query<HashMap<String, String>>) -> Response {
    match params.get("user").map(String::as_str) {
        Some("builderman") | Some("weird name&co") => Json(full_payload()).into_response(),
        Some("sparse") => {
            let mut payload = full_payload();
            let data = payload["data"].as_object_mut().unwrap();
            data.remove("avatar");
            data.remove("achievements");
            Json(payload).into_response()
        }
        Some("missing-id") => {
            let mut payload = full_payload();
            payload["data"]["basic"].as_object_mut().unwrap().remove("id");
            Json(payload).into_response()
        }
        Some("plaintext") => "service temporarily unavailable".into_response(),
        Some("flaky") => (StatusCode::BAD_GATEWAY, "bad gateway").into_response(),
        _ => Json(json!({ "status": false, "data": null })).into_response(),
    }
}

/// Binds the stub on a loopback port and returns the endpoint URL.
async fn spawn_upstream() -> String {
    let router = Router::new().route("/api/stalk/roblox", get(stalk));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind loopback");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve stub");
    });
    format!("http://{addr}/api/stalk/roblox")
}

#[tokio::test]
async fn lookup_transforms_a_full_profile() {
    let client = RobloxClient::new(spawn_upstream().await).unwrap();

    let profile = client.lookup("builderman").await.expect("lookup");
    assert_eq!(profile.id, 156);
    assert_eq!(profile.display_name, "Builderman");
    assert_eq!(profile.friends, 28);
    assert_eq!(profile.badges, 3);
    assert_eq!(
        profile.profile_picture.as_deref(),
        Some("https://cdn.example.com/headshot.png")
    );
}

#[tokio::test]
async fn lookup_url_encodes_the_username() {
    let client = RobloxClient::new(spawn_upstream().await).unwrap();

    // reaches the stub only if the space and ampersand survive encoding
    let profile = client.lookup("weird name&co").await.expect("lookup");
    assert_eq!(profile.name, "builderman");
}

#[tokio::test]
async fn repeated_lookups_are_identical() {
    let client = RobloxClient::new(spawn_upstream().await).unwrap();

    let first = client.lookup("builderman").await.expect("first");
    let second = client.lookup("builderman").await.expect("second");
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_vec(&first).unwrap(),
        serde_json::to_vec(&second).unwrap()
    );
}

#[tokio::test]
async fn sparse_profiles_get_defaults_rather_than_errors() {
    let client = RobloxClient::new(spawn_upstream().await).unwrap();

    let profile = client.lookup("sparse").await.expect("sparse is valid");
    assert_eq!(profile.badges, 0);
    assert_eq!(profile.profile_picture, None);
}

#[tokio::test]
async fn unknown_user_is_not_found_not_a_format_error() {
    let client = RobloxClient::new(spawn_upstream().await).unwrap();

    let err = client.lookup("ghost").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound), "got {err:?}");
}

#[tokio::test]
async fn malformed_responses_are_format_errors() {
    let client = RobloxClient::new(spawn_upstream().await).unwrap();

    let err = client.lookup("missing-id").await.unwrap_err();
    assert!(matches!(err, AppError::UpstreamFormat(_)), "got {err:?}");

    let err = client.lookup("plaintext").await.unwrap_err();
    assert!(matches!(err, AppError::UpstreamFormat(_)), "got {err:?}");
}

#[tokio::test]
async fn upstream_error_status_is_carried_through() {
    let client = RobloxClient::new(spawn_upstream().await).unwrap();

    let err = client.lookup("flaky").await.unwrap_err();
    assert!(
        matches!(err, AppError::Upstream(status) if status == StatusCode::BAD_GATEWAY),
        "got {err:?}"
    );
}

#[tokio::test]
async fn blank_usernames_never_reach_the_network() {
    // unroutable endpoint: a network attempt would error differently
    let client = RobloxClient::new("http://127.0.0.1:9/api/stalk/roblox").unwrap();

    for input in ["", "   ", "\t"] {
        let err = client.lookup(input).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)), "got {err:?}");
    }
}
