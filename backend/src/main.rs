//! KisanSahayak advisory server
//!
//! Climate-resilient crop advisories for smallholder farmers, with offline
//! fallback to the last saved advisory and weekly plan.

use std::{net::SocketAddr, sync::Arc};

use kisan_advisory_backend::{
    config::Config, create_app, AdvisoryService, AppState, ConnectivityMonitor, FileCacheStore,
    GeminiClient,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "kisan_server=debug,kisan_advisory_backend=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting KisanSahayak Advisory Server");
    tracing::info!("Environment: {}", config.environment);

    if config.gemini.api_key.is_empty() {
        tracing::warn!("KISAN_GEMINI__API_KEY is not set; advisories will fall back to saved data");
    }

    let client = GeminiClient::new(&config.gemini)?;
    let cache = FileCacheStore::open(&config.cache.directory)?;
    tracing::info!("Cache directory: {}", config.cache.directory);

    let connectivity = Arc::new(ConnectivityMonitor::new(
        config.connectivity.initially_online,
    ));
    connectivity.subscribe(|transition| {
        tracing::info!("Connectivity: {:?}", transition);
    });

    let advisory = AdvisoryService::new(Arc::new(client), Arc::new(cache), connectivity)
        .with_options(config.workflow.clone());

    // Create application state
    let state = AppState {
        advisory: Arc::new(advisory),
        config: Arc::new(config.clone()),
    };

    // Build application
    let app = create_app(state);

    // Start server
    let host: std::net::IpAddr = config.server.host.parse()?;
    let addr = SocketAddr::from((host, config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
