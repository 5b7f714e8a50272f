use std::net::SocketAddr;

use axum::{Router, Server};
use tokio::signal;

use crate::config::Config;

/// Serves `app` on the configured port, unless the config is in test mode, in
/// which case the port is never bound and this returns right away.
pub async fn run(app: Router, config: &Config) -> Result<(), hyper::Error> {
    if config.test_mode {
        tracing::info!("APP_ENV=test, not binding port {}", config.port);
        return Ok(());
    }

    serve(app, config.port).await
}

/// Binds `0.0.0.0:port` and serves `app` until Ctrl-C or SIGTERM.
pub async fn serve(app: Router, port: u16) -> Result<(), hyper::Error> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let server = Server::try_bind(&addr)?;
    tracing::info!("listening on {}", addr);

    server
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl-C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!("failed to listen for SIGTERM: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
