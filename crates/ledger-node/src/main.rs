use ledger_core::{Chain, Sha256Hasher};
use ledger_node::{app, AppState, Args};
use std::{net::SocketAddr, sync::Arc};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (args, env_loaded) = Args::load();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if !env_loaded {
        warn!(path = %args.env_file.display(), "env file not loaded");
    }

    let config = args.chain_config();
    let chain = Arc::new(Chain::new(Sha256Hasher, config)?);
    info!(?config, "chain initialised");

    let addr: SocketAddr = args.listen.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("ledger-node listening on http://{addr}");
    axum::serve(listener, app(AppState { chain }))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("ledger-node stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(%err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("received ctrl-c, shutting down");
}
