pub mod error;
pub mod greeter;
pub mod relay;
pub mod state;

use anyhow::{Context, Result};
use axum::{
    routing::{any, post},
    Router,
};
use state::SharedState;
use tower_http::trace::TraceLayer;

pub fn greeter_router() -> Router {
    Router::new()
        .route("/", any(greeter::hello))
        .layer(TraceLayer::new_for_http())
}

pub fn relay_router(state: SharedState) -> Router {
    Router::new()
        .route("/createjira", post(relay::create_jira))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Binds `host:port` and serves `app` until Ctrl+C or SIGTERM.
pub async fn serve(service: &'static str, host: &str, port: u16, app: Router) -> Result<()> {
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(
        event = "server_listening",
        service,
        address = %addr,
        "Listening for requests"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!(event = "server_stopped", service, "Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(event = "signal_handler_failed", error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        tracing::info!(event = "shutdown_signal_received", signal = "SIGINT", "Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
                tracing::info!(event = "shutdown_signal_received", signal = "SIGTERM", "Received SIGTERM, shutting down");
            }
            Err(e) => {
                tracing::error!(event = "signal_handler_failed", error = %e, "Failed to listen for SIGTERM");
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
}
