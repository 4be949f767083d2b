use crate::state::AppState;
use axum::{routing::post, Router};

pub mod inbox;

pub fn routes() -> Router<AppState> {
    Router::new().route("/{user}/inbox", post(inbox::post))
}
