use axum::routing::get;
use axum_prometheus::PrometheusMetricLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use link_preview_server::config::Config;
use link_preview_server::routes;
use link_preview_server::state::AppState;

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    // Initialize tracing: JSON in production, human-readable in dev.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("link_preview_server=info,tower_http=info"));

    if config.is_production {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    info!("🚀 Link preview server starting...");
    info!(
        cache_ttl = ?config.cache_ttl,
        fetch_timeout = ?config.fetch.timeout,
        max_retries = config.fetch.max_retries,
        "📝 Configuration loaded"
    );

    let state = AppState::new(&config).expect("Failed to build HTTP clients");
    state.cache.spawn_sweeper(config.cache_sweep_interval);

    // Prometheus metrics layer
    let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();

    let app = routes::router(state)
        .route(
            "/metrics",
            get(move || async move { metric_handle.render() }),
        )
        .layer(prometheus_layer);

    let addr = config.server_addr();
    info!("🎧 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .await
        .expect("Server failed to start");
}
