use crate::state::AppState;
use axum::Router;

pub mod client;
pub mod dto;
pub mod handlers;

pub use client::RobloxClient;
pub use dto::RobloxProfile;

pub fn router() -> Router<AppState> {
    handlers::lookup_routes()
}
