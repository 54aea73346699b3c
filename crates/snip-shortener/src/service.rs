use async_trait::async_trait;
use jiff::SignedDuration;
use snip_core::{
    Clock, ReadRepository, Repository, ShortCode, Shortened, Shortener, ShortenerError,
    StorageError, SystemClock, UrlRecord, Visit,
};
use snip_generator::Generator;
use std::sync::Arc;
use tracing::{debug, info, trace, warn};
use typed_builder::TypedBuilder;

pub const DEFAULT_TTL: SignedDuration = SignedDuration::from_mins(30);
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Tunables of a [`ShortenerService`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct ShortenerSettings {
    /// Public origin that short URLs are built on.
    #[builder(default = DEFAULT_BASE_URL.to_string(), setter(into))]
    pub base_url: String,
    /// How long a link keeps redirecting after creation.
    #[builder(default = DEFAULT_TTL)]
    pub ttl: SignedDuration,
    /// Generation attempts before giving up on colliding codes.
    #[builder(default = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,
    /// Codes that are never handed out, e.g. path segments the gateway routes itself.
    #[builder(default, setter(into))]
    pub reserved_codes: Vec<String>,
}

impl Default for ShortenerSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// A concrete implementation of the `Shortener` trait.
///
/// This service wraps a `Repository`, a `Generator` and a `Clock` to handle:
/// - URL validation
/// - Short code generation, retried on collision
/// - Expiry computation and enforcement
/// - Click counting
#[derive(Debug, Clone)]
pub struct ShortenerService<R, G, C = SystemClock> {
    repository: Arc<R>,
    generator: Arc<G>,
    clock: C,
    settings: ShortenerSettings,
}

impl<R: Repository, G: Generator> ShortenerService<R, G, SystemClock> {
    /// Creates a new `ShortenerService` reading the wall clock.
    pub fn new(repository: R, generator: G, settings: ShortenerSettings) -> Self {
        Self::with_clock(repository, generator, SystemClock, settings)
    }
}

impl<R: Repository, G: Generator, C: Clock> ShortenerService<R, G, C> {
    /// Creates a new `ShortenerService` with a custom clock.
    pub fn with_clock(repository: R, generator: G, clock: C, settings: ShortenerSettings) -> Self {
        Self {
            repository: Arc::new(repository),
            generator: Arc::new(generator),
            clock,
            settings,
        }
    }

    /// Only presence and an `http` prefix are checked, so `https` passes too.
    fn validate_url(url: &str) -> Result<(), ShortenerError> {
        if url.is_empty() {
            return Err(ShortenerError::InvalidUrl(
                "URL cannot be empty".to_string(),
            ));
        }

        if !url.starts_with("http") {
            return Err(ShortenerError::InvalidUrl(format!(
                "URL must start with http: {}",
                url
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl<R: Repository, G: Generator, C: Clock> Shortener for ShortenerService<R, G, C> {
    async fn shorten(&self, original_url: String) -> Result<Shortened, ShortenerError> {
        Self::validate_url(&original_url)?;

        let created_at = self.clock.now();
        let expire_at = created_at
            .checked_add(self.settings.ttl)
            .map_err(|e| ShortenerError::InvalidExpiry(e.to_string()))?;

        for attempt in 1..=self.settings.max_attempts {
            let code: ShortCode = self.generator.generate().into();
            if self.settings.reserved_codes.iter().any(|r| r == code.as_str()) {
                warn!(code = %code, attempt, "generated short code is reserved");
                continue;
            }
            let record = UrlRecord {
                original_url: original_url.clone(),
                short_url: code.to_url(&self.settings.base_url),
                created_at,
                expire_at,
                clicks: 0,
            };

            match self.repository.insert(&code, record.clone()).await {
                Ok(()) => {
                    info!(code = %code, expire_at = %expire_at, "created short url");
                    return Ok(Shortened { code, record });
                }
                Err(StorageError::Conflict(_)) => {
                    warn!(code = %code, attempt, "generated short code collided");
                }
            }
        }

        Err(ShortenerError::CodeSpaceExhausted(self.settings.max_attempts))
    }

    async fn stats(&self, code: &ShortCode) -> Result<Option<UrlRecord>, ShortenerError> {
        trace!(code = %code, "fetching stats");
        Ok(self.repository.get(code).await?)
    }

    async fn visit(&self, code: &ShortCode) -> Result<Visit, ShortenerError> {
        let Some(record) = self.repository.get(code).await? else {
            trace!(code = %code, "short code not found");
            return Ok(Visit::NotFound);
        };

        if record.is_expired_at(self.clock.now()) {
            debug!(code = %code, expire_at = %record.expire_at, "short code has expired");
            return Ok(Visit::Expired);
        }

        match self.repository.record_click(code).await? {
            Some(clicks) => {
                debug!(code = %code, clicks, url = %record.original_url, "redirecting");
                Ok(Visit::Redirect(record.original_url))
            }
            None => Ok(Visit::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::Timestamp;
    use snip_core::ManualClock;
    use snip_generator::SeqGenerator;
    use snip_storage::InMemoryRepository;

    type TestService = ShortenerService<InMemoryRepository, SeqGenerator, ManualClock>;

    fn start() -> Timestamp {
        "2025-01-01T00:00:00Z".parse().unwrap()
    }

    fn test_service() -> (TestService, ManualClock) {
        let clock = ManualClock::new(start());
        let service = ShortenerService::with_clock(
            InMemoryRepository::new(),
            SeqGenerator::with_prefix("wh"),
            clock.clone(),
            ShortenerSettings::default(),
        );
        (service, clock)
    }

    fn code(s: &str) -> ShortCode {
        ShortCode::new(s).unwrap()
    }

    #[tokio::test]
    async fn shorten_builds_record() {
        let (service, _) = test_service();

        let shortened = service
            .shorten("https://example.com".to_string())
            .await
            .unwrap();

        assert_eq!(shortened.code.as_str(), "wh0000");
        assert_eq!(shortened.record.original_url, "https://example.com");
        assert_eq!(shortened.record.short_url, "http://localhost:3000/wh0000");
        assert_eq!(shortened.record.created_at, start());
        assert_eq!(
            shortened.record.expire_at,
            "2025-01-01T00:30:00Z".parse::<Timestamp>().unwrap()
        );
        assert_eq!(shortened.record.clicks, 0);
    }

    #[tokio::test]
    async fn shorten_uses_configured_ttl_and_base_url() {
        let service = ShortenerService::with_clock(
            InMemoryRepository::new(),
            SeqGenerator::with_prefix("wh"),
            ManualClock::new(start()),
            ShortenerSettings::builder()
                .base_url("https://sn.ip/")
                .ttl(SignedDuration::from_hours(1))
                .build(),
        );

        let shortened = service.shorten("http://a.b".to_string()).await.unwrap();

        assert_eq!(shortened.record.short_url, "https://sn.ip/wh0000");
        assert_eq!(
            shortened.record.expire_at,
            start() + SignedDuration::from_hours(1)
        );
    }

    #[tokio::test]
    async fn shorten_rejects_missing_http_prefix() {
        let (service, _) = test_service();

        for url in ["", "ftp://example.com", "example.com", "www.example.com"] {
            let err = service.shorten(url.to_string()).await.unwrap_err();
            assert!(matches!(err, ShortenerError::InvalidUrl(_)), "{url}");
        }
    }

    #[tokio::test]
    async fn shorten_retries_on_collision() {
        let repo = InMemoryRepository::new();
        let taken = UrlRecord {
            original_url: "https://taken.com".to_string(),
            short_url: "http://localhost:3000/wh0000".to_string(),
            created_at: start(),
            expire_at: start() + DEFAULT_TTL,
            clicks: 0,
        };
        repo.insert(&code("wh0000"), taken).await.unwrap();

        let service = ShortenerService::with_clock(
            repo,
            SeqGenerator::with_prefix("wh"),
            ManualClock::new(start()),
            ShortenerSettings::default(),
        );

        let shortened = service
            .shorten("https://example.com".to_string())
            .await
            .unwrap();
        assert_eq!(shortened.code.as_str(), "wh0001");
    }

    #[tokio::test]
    async fn shorten_skips_reserved_codes() {
        let service = ShortenerService::with_clock(
            InMemoryRepository::new(),
            SeqGenerator::with_prefix("wh"),
            ManualClock::new(start()),
            ShortenerSettings::builder()
                .reserved_codes(vec!["wh0000".to_string()])
                .build(),
        );

        let shortened = service
            .shorten("https://example.com".to_string())
            .await
            .unwrap();

        assert_eq!(shortened.code.as_str(), "wh0001");
        assert!(service.stats(&code("wh0000")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn shorten_gives_up_after_max_attempts() {
        let (service, _) = test_service();
        let preview = SeqGenerator::with_prefix("wh");
        for _ in 0..3 {
            let c = preview.generate();
            service
                .repository
                .insert(
                    &c,
                    UrlRecord {
                        original_url: "https://taken.com".to_string(),
                        short_url: c.to_url(DEFAULT_BASE_URL),
                        created_at: start(),
                        expire_at: start() + DEFAULT_TTL,
                        clicks: 0,
                    },
                )
                .await
                .unwrap();
        }

        let err = service
            .shorten("https://example.com".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, ShortenerError::CodeSpaceExhausted(3)));
    }

    #[tokio::test]
    async fn stats_for_unknown_code() {
        let (service, _) = test_service();

        assert!(service.stats(&code("nope00")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn stats_available_after_expiry() {
        let (service, clock) = test_service();
        let shortened = service
            .shorten("https://example.com".to_string())
            .await
            .unwrap();

        clock.advance(SignedDuration::from_hours(2));

        let record = service.stats(&shortened.code).await.unwrap().unwrap();
        assert_eq!(record, shortened.record);
    }

    #[tokio::test]
    async fn visit_counts_clicks_before_expiry() {
        let (service, clock) = test_service();
        let shortened = service
            .shorten("https://example.com".to_string())
            .await
            .unwrap();

        assert_eq!(
            service.visit(&shortened.code).await.unwrap(),
            Visit::Redirect("https://example.com".to_string())
        );
        clock.advance(SignedDuration::from_mins(30));
        assert_eq!(
            service.visit(&shortened.code).await.unwrap(),
            Visit::Redirect("https://example.com".to_string())
        );

        let record = service.stats(&shortened.code).await.unwrap().unwrap();
        assert_eq!(record.clicks, 2);
    }

    #[tokio::test]
    async fn visit_after_expiry_does_not_count() {
        let (service, clock) = test_service();
        let shortened = service
            .shorten("https://example.com".to_string())
            .await
            .unwrap();

        clock.advance(SignedDuration::from_mins(30) + SignedDuration::from_millis(1));

        assert_eq!(
            service.visit(&shortened.code).await.unwrap(),
            Visit::Expired
        );
        let record = service.repository.get(&shortened.code).await.unwrap().unwrap();
        assert_eq!(record.clicks, 0);
    }

    #[tokio::test]
    async fn visit_unknown_code() {
        let (service, _) = test_service();

        assert_eq!(
            service.visit(&code("nope00")).await.unwrap(),
            Visit::NotFound
        );
    }
}
