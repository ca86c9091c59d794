use rust_twenty_dashboard::config::Config;
use rust_twenty_dashboard::handlers::AppState;
use rust_twenty_dashboard::huly_client::HulyClient;
use rust_twenty_dashboard::routes;
use rust_twenty_dashboard::twenty_client::TwentyCrmClient;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the dashboard server.
///
/// Sets up tracing, loads configuration, builds the Twenty and Huly clients and
/// serves the dashboard API.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rust_twenty_dashboard=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!("Configuration loaded successfully");

    let twenty = TwentyCrmClient::new(config.twenty.clone())?;
    tracing::info!("✓ Twenty CRM client initialized: {}", config.twenty.base_url);

    let huly = HulyClient::new(config.huly.clone())?;
    tracing::info!("✓ Huly client initialized: {}", config.huly.base_url);

    let app_state = Arc::new(AppState {
        config: config.clone(),
        twenty,
        huly,
    });

    // 10 requests/second per IP, burst of 20
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .ok_or_else(|| anyhow::anyhow!("Invalid rate limiter configuration"))?,
    );

    let api = routes::api_routes().layer(GovernorLayer {
        config: governor_conf,
    });
    let app = routes::app(app_state, api);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
