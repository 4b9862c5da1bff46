//! User listing.

use axum::extract::State;
use axum::Json;
use nutrition_store::UserRepository;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct UserCount {
    pub count: usize,
}

/// Number of stored users.
pub async fn count(State(state): State<AppState>) -> Json<UserCount> {
    Json(UserCount {
        count: state.store().all_users().await.len(),
    })
}
