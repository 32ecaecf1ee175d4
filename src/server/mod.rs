//! HTTP server for the chess agent API.
//!
//! Provides REST endpoints for:
//! - Session lifecycle (create, inspect, reset, delete)
//! - Chat turns
//! - Transcript download
//!
//! A background sweeper drops sessions left idle past the configured TTL.

pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::AppState;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Upper bound on how often the idle sweeper wakes.
const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

fn sweep_interval(idle_ttl: Duration) -> Duration {
    (idle_ttl / 2).clamp(Duration::from_secs(1), MAX_SWEEP_INTERVAL)
}

async fn sweep_idle_sessions(state: Arc<AppState>) {
    let idle_ttl = state.idle_ttl();
    let mut ticker = tokio::time::interval(sweep_interval(idle_ttl));
    loop {
        ticker.tick().await;
        state.prune_idle(idle_ttl);
    }
}

/// Serve the API until `shutdown_signal` completes.
///
/// In-flight turns finish before the listener closes.
///
/// # Errors
/// Returns an error if the listener cannot bind or the server fails.
pub async fn run_server_with_shutdown<F>(
    state: Arc<AppState>,
    port: u16,
    shutdown_signal: F,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = create_router(Arc::clone(&state))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        "Chess agent listening on http://{addr} (idle session TTL {}s)",
        state.idle_ttl().as_secs()
    );

    let sweeper = tokio::spawn(sweep_idle_sessions(Arc::clone(&state)));
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await;
    sweeper.abort();

    tracing::info!("Server stopped with {} open sessions", state.session_count());
    served?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_interval_bounds() {
        assert_eq!(sweep_interval(Duration::from_secs(3600)), MAX_SWEEP_INTERVAL);
        assert_eq!(sweep_interval(Duration::from_secs(30)), Duration::from_secs(15));
        assert_eq!(sweep_interval(Duration::from_secs(1)), Duration::from_secs(1));
    }
}
