use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use snip_core::{ReadRepository, Repository, ShortCode, StorageError, UrlRecord};
use tracing::trace;

type Result<T> = std::result::Result<T, StorageError>;

/// In-memory implementation of the Repository trait using DashMap.
///
/// DashMap shards its locks, so concurrent requests touching different
/// codes do not block each other. Records are never evicted.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    storage: DashMap<String, UrlRecord>,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self {
            storage: DashMap::new(),
        }
    }

    /// Number of stored records, expired ones included.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        Ok(self
            .storage
            .get(code.as_str())
            .map(|entry| entry.value().clone()))
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn insert(&self, code: &ShortCode, record: UrlRecord) -> Result<()> {
        // The entry API holds the shard lock, so check-and-insert is atomic.
        match self.storage.entry(code.as_str().to_owned()) {
            Entry::Occupied(_) => Err(StorageError::Conflict(code.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(record);
                trace!(code = %code, "stored url record");
                Ok(())
            }
        }
    }

    async fn record_click(&self, code: &ShortCode) -> Result<Option<u64>> {
        Ok(self.storage.get_mut(code.as_str()).map(|mut entry| {
            entry.clicks += 1;
            entry.clicks
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::{SignedDuration, Timestamp};
    use std::sync::Arc;

    fn code(s: &str) -> ShortCode {
        ShortCode::new_unchecked(s)
    }

    fn record(url: &str) -> UrlRecord {
        let created_at = Timestamp::from_second(0).unwrap();
        UrlRecord {
            original_url: url.to_string(),
            short_url: "http://localhost:3000/abc123".to_string(),
            created_at,
            expire_at: created_at + SignedDuration::from_mins(30),
            clicks: 0,
        }
    }

    #[tokio::test]
    async fn save_and_get() {
        let repo = InMemoryRepository::new();

        repo.insert(&code("abc123"), record("https://example.com"))
            .await
            .unwrap();

        let result = repo.get(&code("abc123")).await.unwrap().unwrap();
        assert_eq!(result, record("https://example.com"));
    }

    #[tokio::test]
    async fn get_nonexistent() {
        let repo = InMemoryRepository::new();

        let result = repo.get(&code("nope")).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn insert_conflict_keeps_first_record() {
        let repo = InMemoryRepository::new();

        repo.insert(&code("abc123"), record("https://example.com"))
            .await
            .unwrap();

        let err = repo
            .insert(&code("abc123"), record("https://other.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::Conflict(ref c) if c == "abc123"));
        let stored = repo.get(&code("abc123")).await.unwrap().unwrap();
        assert_eq!(stored.original_url, "https://example.com");
    }

    #[tokio::test]
    async fn expired_records_are_still_returned() {
        let repo = InMemoryRepository::new();
        let mut rec = record("https://example.com");
        rec.expire_at = Timestamp::now() - SignedDuration::from_secs(1);

        repo.insert(&code("abc123"), rec.clone()).await.unwrap();

        assert_eq!(repo.get(&code("abc123")).await.unwrap(), Some(rec));
    }

    #[tokio::test]
    async fn len_counts_records() {
        let repo = InMemoryRepository::new();
        assert!(repo.is_empty());

        repo.insert(&code("abc123"), record("https://example.com"))
            .await
            .unwrap();

        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn record_click_increments() {
        let repo = InMemoryRepository::new();
        repo.insert(&code("abc123"), record("https://example.com"))
            .await
            .unwrap();

        assert_eq!(repo.record_click(&code("abc123")).await.unwrap(), Some(1));
        assert_eq!(repo.record_click(&code("abc123")).await.unwrap(), Some(2));

        let stored = repo.get(&code("abc123")).await.unwrap().unwrap();
        assert_eq!(stored.clicks, 2);
    }

    #[tokio::test]
    async fn record_click_unknown_code() {
        let repo = InMemoryRepository::new();

        assert_eq!(repo.record_click(&code("nope")).await.unwrap(), None);
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn concurrent_clicks_are_not_lost() {
        let repo = Arc::new(InMemoryRepository::new());
        repo.insert(&code("abc123"), record("https://example.com"))
            .await
            .unwrap();

        let mut handles = vec![];
        for _ in 0..50 {
            let repo = Arc::clone(&repo);
            handles.push(tokio::spawn(async move {
                repo.record_click(&code("abc123")).await.unwrap();
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        let stored = repo.get(&code("abc123")).await.unwrap().unwrap();
        assert_eq!(stored.clicks, 50);
    }

    #[tokio::test]
    async fn concurrent_inserts() {
        let repo = Arc::new(InMemoryRepository::new());
        let mut handles = vec![];

        for i in 0..10u64 {
            let repo = Arc::clone(&repo);
            handles.push(tokio::spawn(async move {
                let c = ShortCode::new_unchecked(format!("code-{:03}", i));
                repo.insert(&c, record(&format!("https://example{}.com", i)))
                    .await
                    .unwrap();
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        for i in 0..10u64 {
            let c = ShortCode::new_unchecked(format!("code-{:03}", i));
            let result = repo.get(&c).await.unwrap().unwrap();
            assert_eq!(result.original_url, format!("https://example{}.com", i));
        }
    }
}
