use crate::error::StorageError;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

type Result<T> = std::result::Result<T, StorageError>;

/// A stored URL record in the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlRecord {
    /// The original URL that was shortened.
    pub original_url: String,
    /// The public short URL handed back to the client.
    pub short_url: String,
    /// When the record was created.
    pub created_at: Timestamp,
    /// When the record stops redirecting.
    pub expire_at: Timestamp,
    /// Number of successful redirects served for this record.
    pub clicks: u64,
}

impl UrlRecord {
    /// Returns `true` once `now` is strictly past the expiry.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        now > self.expire_at
    }
}

/// A read-only view of a repository.
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Retrieves the URL record for a given short code.
    /// Returns `None` if the code does not exist.
    ///
    /// Expired records are returned as well; expiry is a service concern.
    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>>;
}

#[async_trait]
pub trait Repository: ReadRepository {
    /// Inserts a new URL record. Returns `Err(Conflict)` if the code already exists.
    async fn insert(&self, code: &ShortCode, record: UrlRecord) -> Result<()>;

    /// Increments the click counter of a record.
    /// Returns the new count, or `None` if the code does not exist.
    async fn record_click(&self, code: &ShortCode) -> Result<Option<u64>>;
}
