use std::sync::Arc;

use filmtrack_server::{config::Config, Db, FileStore, MemoryStore};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,filmtrack_server=debug".to_string()),
        )
        .init();

    let config = Config::from_env()?;

    let db: Db = match &config.data_file {
        Some(path) => Arc::new(FileStore::open(path).await?),
        None => {
            tracing::warn!("FILMTRACK_DATA_FILE not set, films are kept in memory only");
            Arc::new(MemoryStore::new())
        }
    };

    let listener = TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    filmtrack_server::run(listener, db).await?;

    Ok(())
}
