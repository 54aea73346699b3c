use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use snip_core::UrlRecord;

/// Timestamps go out as UTC ISO-8601 with millisecond precision.
fn iso8601(timestamp: Timestamp) -> String {
    format!("{:.3}", timestamp)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUrlRequest {
    pub original_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateUrlResponse {
    pub shortlink: String,
    pub expiry: String,
}

impl From<&UrlRecord> for CreateUrlResponse {
    fn from(record: &UrlRecord) -> Self {
        Self {
            shortlink: record.short_url.clone(),
            expiry: iso8601(record.expire_at),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlStatsResponse {
    pub original_url: String,
    pub shortlink: String,
    pub created_at: String,
    pub expiry: String,
    pub total_clicks: u64,
}

impl From<UrlRecord> for UrlStatsResponse {
    fn from(record: UrlRecord) -> Self {
        Self {
            original_url: record.original_url,
            shortlink: record.short_url,
            created_at: iso8601(record.created_at),
            expiry: iso8601(record.expire_at),
            total_clicks: record.clicks,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::SignedDuration;

    #[test]
    fn timestamps_have_millisecond_precision() {
        let ts: Timestamp = "2025-01-01T00:30:00Z".parse().unwrap();
        assert_eq!(iso8601(ts), "2025-01-01T00:30:00.000Z");

        let ts = ts + SignedDuration::from_millis(123);
        assert_eq!(iso8601(ts), "2025-01-01T00:30:00.123Z");
    }
}
