use marquee_api::api::{create_router, AppState};
use marquee_api::config::Config;
use marquee_api::services::{loader, Catalog, GraphBuilder};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "marquee_api=info,tower_http=info".into()),
        )
        .init();

    let loaded = loader::read_catalog_file(&config.catalog_csv).map_err(|e| {
        anyhow::anyhow!("failed to read catalog from {}: {}", config.catalog_csv, e)
    })?;

    let builder = GraphBuilder::new(config.graph_window, config.graph_rating_threshold);
    let mut catalog = Catalog::new();
    let summary = catalog.load(&loaded.rows, &builder);

    tracing::info!(
        loaded = summary.loaded,
        duplicate_ids = summary.duplicate_ids,
        duplicate_titles = summary.duplicate_titles,
        skipped_rows = loaded.skipped,
        graph_edges = catalog.graph().edge_count(),
        "Catalog ready"
    );

    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState::new(catalog, config);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
