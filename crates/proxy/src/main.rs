#![deny(unsafe_code)]

use clap::Parser;
use sakura_fx_proxy::{AppState, Endpoints, EnvSecrets};
use std::{net::SocketAddr, process, sync::Arc};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sakura-fx-proxy", about = "Serves the recently played track as JSON")]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "SAKURA_FX_BIND", default_value = "127.0.0.1:3000")]
    bind: SocketAddr,

    /// Refresh-token grant endpoint.
    #[arg(long, default_value = sakura_fx_proxy::upstream::TOKEN_URL)]
    token_url: String,

    /// Recently-played endpoint.
    #[arg(long, default_value = sakura_fx_proxy::upstream::RECENT_URL)]
    recent_url: String,
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(?e, "could not listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let state = Arc::new(AppState::new(Arc::new(EnvSecrets), Endpoints {
        token_url: args.token_url,
        recent_url: args.recent_url,
    }));

    let listener = match TcpListener::bind(args.bind).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(bind = %args.bind, error = %e, "could not bind");
            process::exit(1);
        },
    };
    if let Err(e) = sakura_fx_proxy::run(listener, state, shutdown_signal()).await {
        tracing::error!(error = %e, "server failed");
        process::exit(1);
    }
}
