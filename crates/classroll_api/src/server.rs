//! Server lifecycle: store bootstrap, bind, serve, graceful shutdown.

use crate::config::ServerConfig;
use crate::handler::routes::create_router;
use crate::state::AppState;
use anyhow::{Context, Result};
use axum::extract::Request;
use axum::ServiceExt;
use log::{error, info};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::signal;

/// A fully initialized server ready to run.
#[must_use = "call .run().await to start the server"]
pub struct Server {
    address: SocketAddr,
    state: AppState,
}

impl Server {
    /// Opens the configured store and prepares shared state.
    ///
    /// # Errors
    /// - Returns an error when the store cannot be opened or migrated.
    pub fn build(config: &ServerConfig) -> Result<Self> {
        let conn = config
            .open_store()
            .with_context(|| format!("failed to open store at `{}`", config.db_path))?;

        Ok(Self {
            address: config.socket_addr(),
            state: AppState::new(conn),
        })
    }

    /// Serves until Ctrl+C or SIGTERM, then drains in-flight requests.
    ///
    /// # Errors
    /// - Returns an error when binding the address or serving fails.
    pub async fn run(self) -> Result<()> {
        let listener = TcpListener::bind(self.address)
            .await
            .with_context(|| format!("failed to bind {}", self.address))?;
        info!(
            "event=server_start module=api status=ok address={}",
            self.address
        );

        let app = create_router(self.state);
        axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP server failed")?;

        info!("event=server_stop module=api status=ok");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("event=shutdown_signal module=api status=error signal=ctrl_c error={err}");
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
                error!("event=shutdown_signal module=api status=error signal=sigterm error={err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("event=shutdown_signal module=api status=ok");
}
