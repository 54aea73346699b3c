//! Storage backends for snip.
//!
//! Only the in-memory backend exists; records live for the lifetime of the
//! process.

pub mod memory;

pub use memory::InMemoryRepository;
pub use snip_core::{ReadRepository, Repository, StorageError, UrlRecord};
