//! Route handlers for the webhook server.

pub mod health;
pub mod twochat;
pub mod users;
pub mod webhook;

use axum::routing::{delete, get, post};
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Inbound WhatsApp messages
        .route("/api/webhook", post(webhook::receive))
        // Health check
        .route("/health", get(health::health))
        // 2Chat admin
        .route("/api/twochat/check", get(twochat::check_api_key))
        .route("/api/twochat/numbers", get(twochat::numbers))
        .route(
            "/api/twochat/send-test-message",
            post(twochat::send_test_message),
        )
        .route(
            "/api/twochat/webhook",
            post(twochat::subscribe_webhook).get(twochat::list_webhooks),
        )
        .route("/api/twochat/webhook/:uuid", delete(twochat::delete_webhook))
        // Users
        .route("/api/users", get(users::count))
}
