use clap::Parser;
use jiff::SignedDuration;
use snip_telemetry::{LogFormat, TelemetryConfig};
use std::net::SocketAddr;

pub const LISTEN_ADDR_ENV: &str = "SNIP_GATEWAY_LISTEN_ADDR";
pub const PUBLIC_BASE_URL_ENV: &str = "SNIP_GATEWAY_PUBLIC_BASE_URL";
pub const LINK_TTL_ENV: &str = "SNIP_LINK_TTL";
pub const CODE_LENGTH_ENV: &str = "SNIP_CODE_LENGTH";
pub const LOG_FORMAT_ENV: &str = "SNIP_LOG_FORMAT";
pub const OTLP_ENDPOINT_ENV: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_LINK_TTL: &str = "30m";
pub const DEFAULT_CODE_LENGTH: &str = "6";

const SERVICE_NAME: &str = "snip-gateway";

#[derive(Debug, Parser)]
#[command(name = "gateway")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Origin prepended to short codes in the links handed to clients.
    #[arg(long, env = PUBLIC_BASE_URL_ENV, default_value = DEFAULT_PUBLIC_BASE_URL)]
    pub public_base_url: String,

    /// How long a link redirects after creation, e.g. `30m` or `2h`.
    #[arg(
        long,
        env = LINK_TTL_ENV,
        default_value = DEFAULT_LINK_TTL,
        value_parser = parse_ttl,
    )]
    pub link_ttl: SignedDuration,

    #[arg(
        long,
        env = CODE_LENGTH_ENV,
        default_value = DEFAULT_CODE_LENGTH,
        value_parser = clap::value_parser!(u8).range(3..=32),
    )]
    pub code_length: u8,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    #[arg(long, env = OTLP_ENDPOINT_ENV)]
    pub otlp_endpoint: Option<String>,
}

impl CLI {
    pub fn telemetry(&self) -> TelemetryConfig {
        TelemetryConfig::builder()
            .service_name(SERVICE_NAME)
            .log_format(self.log_format)
            .otlp_endpoint(self.otlp_endpoint.clone())
            .build()
    }
}

fn parse_ttl(value: &str) -> Result<SignedDuration, String> {
    let ttl: SignedDuration = value.parse().map_err(|e: jiff::Error| e.to_string())?;
    if !ttl.is_positive() {
        return Err(format!("link ttl must be positive, got {value}"));
    }
    Ok(ttl)
}
