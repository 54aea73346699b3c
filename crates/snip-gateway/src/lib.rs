//! HTTP gateway for the snip URL shortener.
//!
//! Exposes link creation, link statistics and the redirect itself over
//! axum, on top of any [`snip_core::Shortener`].

pub mod app;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;

pub use app::App;
pub use state::AppState;
