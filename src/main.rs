use std::sync::Arc;

use tracing::{info, warn};

use schoold::config::Config;
use schoold::http::{self, AppState};
use schoold::store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::from_env();

    // A missing store degrades the API (writes fail, lists come back empty)
    // but must not keep the server from answering health checks.
    let store = match store::open_store(&config.data_dir) {
        Ok(s) => {
            info!("store opened at {}", config.data_dir.display());
            Some(s)
        }
        Err(e) => {
            warn!("store unavailable: {e:#}");
            None
        }
    };

    let addr = format!("0.0.0.0:{}", config.port);
    let state = Arc::new(AppState { config, store });

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("listening on {addr}");
    axum::serve(listener, http::router(state)).await?;

    Ok(())
}
