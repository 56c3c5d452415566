//! home-shelf: configurable category product blocks for a storefront home page.
//!
//! Resolves each configured category to a presentable product list through a
//! tiered fetch pipeline (search provider → direct listing → child-category
//! top-up) and serves the assembled blocks over a JSON HTTP API.

use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};

use home_shelf::catalog::search::SearchProvider;
use home_shelf::catalog::store::InMemoryCatalog;
use home_shelf::catalog::Catalog;
use home_shelf::config::{Cli, Config};
use home_shelf::server::api::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments.
    let cli = Cli::parse();

    // Initialize tracing/logging.
    let filter = if cli.verbose {
        "home_shelf=debug,tower_http=debug"
    } else {
        "home_shelf=info,tower_http=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with_target(true)
        .init();

    info!("home-shelf v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration.
    let config = Config::load(&cli.config)?;
    let config = Arc::new(config);

    info!(
        categories = ?config.blocks.category_ids,
        sort = %config.blocks.sort_order,
        per_block = config.blocks.products_per_block,
        include_children = config.blocks.include_children,
        children_depth = config.blocks.children_depth,
        in_stock_only = config.blocks.in_stock_only,
        "Block settings loaded"
    );

    // Load the catalog snapshot.
    let catalog = if config.catalog.catalog_path.exists() {
        Arc::new(InMemoryCatalog::load(&config.catalog.catalog_path)?)
    } else {
        warn!(
            path = %config.catalog.catalog_path.display(),
            "Catalog snapshot not found, starting with an empty catalog"
        );
        Arc::new(InMemoryCatalog::empty())
    };

    info!(
        categories = catalog.category_count(),
        products = catalog.product_count(),
        "Catalog snapshot loaded"
    );

    // Build application state. The in-memory catalog serves both seams.
    let catalog_seam: Arc<dyn Catalog> = catalog.clone();
    let search_seam: Arc<dyn SearchProvider> = catalog;
    let state = Arc::new(AppState::new(config.clone(), catalog_seam, search_seam));

    // Build the HTTP router.
    let app = build_router(state);

    // Start the server.
    let listen_addr = cli.listen.unwrap_or_else(|| config.server.listen.clone());
    info!(addr = listen_addr, "Starting server");

    let listener = TcpListener::bind(&listen_addr).await?;
    info!("Listening on {listen_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
