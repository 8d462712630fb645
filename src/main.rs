//! Keyword News Monitor — Binary Entrypoint
//! Boots the poll loop and the Axum control surface.
//!
//! See `README.md` for quickstart.

use std::sync::Arc;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use keyword_news_monitor::api::{self, AppState};
use keyword_news_monitor::config::MonitorConfig;
use keyword_news_monitor::ingest::providers::google_news_rss::GoogleNewsRss;
use keyword_news_monitor::metrics::Metrics;
use keyword_news_monitor::monitor::MonitorBuilder;
use keyword_news_monitor::notify::NotifierMux;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("keyword_news_monitor=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = MonitorConfig::load_default();
    tracing::info!(keywords = cfg.keywords.len(), "configuration loaded");

    let metrics = Metrics::init();

    let monitor = Arc::new(
        MonitorBuilder::new(cfg)
            .build(Box::new(GoogleNewsRss::new()), NotifierMux::from_env())
            .await,
    );
    monitor.clone().spawn_poll_loop();

    let router = api::create_router(AppState { monitor }).merge(metrics.router());

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8000);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!(%port, "keyword news monitor listening");
    axum::serve(listener, router).await?;
    Ok(())
}
