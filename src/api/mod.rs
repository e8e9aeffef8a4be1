use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

mod error;
mod hits;
mod state;

pub use error::*;
pub use state::*;

pub type Result<T, E = ApiError> = std::result::Result<T, E>;

pub fn create_router(app: App) -> Router {
    Router::new()
        .route("/hit", post(hits::create))
        .route("/stats", get(hits::stats))
        .layer(TraceLayer::new_for_http())
        .with_state(app)
}
