mod cli;

use crate::cli::CLI;
use clap::Parser;
use snip_gateway::{App, AppState};
use snip_generator::RandomGenerator;
use snip_shortener::{ShortenerService, ShortenerSettings};
use snip_storage::InMemoryRepository;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();
    let _telemetry = snip_telemetry::init(&config.telemetry())?;

    info!(
        public_base_url = %config.public_base_url,
        link_ttl = %config.link_ttl,
        code_length = config.code_length,
        log_format = %config.log_format,
        "configuring gateway"
    );

    let settings = ShortenerSettings::builder()
        .base_url(config.public_base_url.clone())
        .ttl(config.link_ttl)
        .reserved_codes(App::RESERVED_PATHS.map(String::from).to_vec())
        .build();
    let shortener = ShortenerService::new(
        InMemoryRepository::new(),
        RandomGenerator::with_length(usize::from(config.code_length)),
        settings,
    );
    let app = App::router(AppState::new(Arc::new(shortener)));

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "starting gateway server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("gateway server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received ctrl-c, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
