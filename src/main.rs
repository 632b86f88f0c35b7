use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use tunefeed::api::{create_router, AppState};
use tunefeed::config::Config;
use tunefeed::library::persist::Storage;
use tunefeed::services::providers::{ExtractorResolver, HttpCatalog};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tunefeed=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let storage = Storage::new(&config.data_dir);
    let catalog = Arc::new(HttpCatalog::new(config.catalog_api_url.clone()));
    let resolver = Arc::new(ExtractorResolver::new(config.resolver_api_url.clone()));

    let state = AppState::new(catalog, resolver, storage);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!(host = %config.host, port = config.port, "tunefeed listening");
    axum::serve(listener, app).await?;

    Ok(())
}
