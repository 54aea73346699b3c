//! URL shortener service implementation.
//!
//! This crate provides [`ShortenerService`], the business rules behind the
//! create, stats and redirect endpoints. Core types are re-exported from
//! `snip_core`.

pub mod service;

pub use service::{ShortenerService, ShortenerSettings};
pub use snip_core::{Shortened, Shortener, ShortenerError, Visit};
