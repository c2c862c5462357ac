use std::sync::Arc;

use mock_server::{Db, Store};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let seed = std::env::var("SEED")
        .map(|v| matches!(v.as_str(), "1" | "true"))
        .unwrap_or(false);

    let store = if seed { Store::seeded() } else { Store::default() };
    info!(items = store.len(), "store ready");
    let db: Db = Arc::new(RwLock::new(store));

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    mock_server::run(listener, db).await?;
    Ok(())
}
