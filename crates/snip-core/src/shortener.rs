use crate::repository::UrlRecord;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

type Result<T> = std::result::Result<T, crate::error::ShortenerError>;

/// A freshly created short link.
#[derive(Debug, Clone, PartialEq)]
pub struct Shortened {
    /// The generated short code.
    pub code: ShortCode,
    /// The record as it was stored.
    pub record: UrlRecord,
}

/// Outcome of following a short link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visit {
    /// The link is live; the click was counted and the client should go here.
    Redirect(String),
    /// The link exists but its expiry has passed. No click was counted.
    Expired,
    /// No link is stored under the code.
    NotFound,
}

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Creates a shortened URL with a generated short code.
    async fn shorten(&self, original_url: String) -> Result<Shortened>;

    /// Returns the stored record for a short code, expired or not.
    /// Returns `None` if the code does not exist.
    async fn stats(&self, code: &ShortCode) -> Result<Option<UrlRecord>>;

    /// Follows a short link, counting the click if it is still live.
    async fn visit(&self, code: &ShortCode) -> Result<Visit>;
}
