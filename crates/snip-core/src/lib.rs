//! Core types and traits for the snip URL shortener.
//!
//! This crate provides the types shared by the storage backend, the
//! shortener service and the HTTP gateway.

pub mod clock;
pub mod error;
pub mod repository;
pub mod shortcode;
pub mod shortener;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CoreError, ShortenerError, StorageError};
pub use repository::{ReadRepository, Repository, UrlRecord};
pub use shortcode::ShortCode;
pub use shortener::{Shortened, Shortener, Visit};
