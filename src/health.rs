use std::net::SocketAddr;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tracing::{error, info};

pub const ALIVE: &str = "UwU bot is alive 😈";

/// Single route for the hosting platform's uptime probe.
pub fn router() -> Router {
    Router::new().route("/", get(alive))
}

async fn alive() -> &'static str {
    ALIVE
}

/// Binds `0.0.0.0:port` and serves the liveness route in the background.
pub async fn spawn(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!(bind = %addr, "Health endpoint listening");

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router()).await {
            error!("Health endpoint stopped: {}", e);
        }
    });

    Ok(())
}
