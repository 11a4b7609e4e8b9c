use anyhow::Context;
use palmar_store::{HandStore, MemoryStore, SqliteStore};
use palmard::{config::Config, engine::Engine, http_interface};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    tracing::info!("palmard starting");

    let config = Config::from_env();

    let store: Arc<dyn HandStore> = if config.ephemeral {
        tracing::warn!("PALMAR_EPHEMERAL=1: hand records will not survive a restart");
        Arc::new(MemoryStore::new())
    } else {
        if let Some(dir) = config.db_path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating data directory {}", dir.display()))?;
        }
        tracing::info!(db = %config.db_path.display(), "opening hand record store");
        Arc::new(
            SqliteStore::open(&config.db_path)
                .await
                .with_context(|| format!("opening database {}", config.db_path.display()))?,
        )
    };

    let engine = Arc::new(Engine::new(store, config.match_threshold));
    let app = http_interface::router(engine);

    let addr: SocketAddr = config
        .bind_addr
        .parse()
        .with_context(|| format!("invalid PALMAR_BIND_ADDR {}", config.bind_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, threshold = config.match_threshold, "palmard ready");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("palmard shutting down");
        })
        .await?;

    Ok(())
}
