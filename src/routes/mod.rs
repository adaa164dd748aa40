use axum::Router;

use crate::AppState;

mod api;
mod health;
mod pages;
mod sessions;

// ---

pub fn router(state: AppState) -> Router {
    // ---
    Router::new()
        .merge(pages::router())
        .merge(api::router())
        .merge(sessions::router())
        .merge(health::router())
        .with_state(state)
}
