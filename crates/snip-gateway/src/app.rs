use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::handlers::{create_url_handler, get_url_handler, health_handler, redirect_handler};
use crate::state::AppState;

pub struct App {}

impl App {
    /// Static path segments routed ahead of `/{short_code}`. A short code
    /// equal to one of them could never be followed, so the shortener must
    /// not hand them out.
    pub const RESERVED_PATHS: [&'static str; 2] = ["healthz", "shorturls"];

    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/healthz", get(health_handler))
            .route(
                "/shorturls",
                post(create_url_handler).get(|| async { AppError::NotFound }),
            )
            .route("/shorturls/{short_code}", get(get_url_handler))
            .route("/{short_code}", get(redirect_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}
