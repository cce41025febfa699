mod middleware;
pub mod rpc;

pub use rpc::{RpcState, build_rpc_router};

use std::{future::IntoFuture, time::Duration};

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    middleware as axum_middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use tokio::{net::TcpListener, signal, sync::watch};
use tracing::{error, info, warn};

use crate::application::error::ErrorReport;
use crate::application::repos::RepoError;
use crate::infra::error::InfraError;

use middleware::{log_responses, set_request_context};

/// Full HTTP surface: RPC procedures, the health probe, and the shared
/// request-id and response-logging layers.
pub fn build_router(state: RpcState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(build_rpc_router())
        .fallback(rpc::handlers::unknown_procedure)
        .with_state(state)
        .layer(axum_middleware::from_fn(log_responses))
        .layer(axum_middleware::from_fn(set_request_context))
}

async fn health(State(state): State<RpcState>) -> Response {
    db_health_response(state.health.ping().await)
}

fn db_health_response(result: Result<(), RepoError>) -> Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            let mut response = StatusCode::SERVICE_UNAVAILABLE.into_response();
            ErrorReport::from_error(
                "infra::http::db_health",
                StatusCode::SERVICE_UNAVAILABLE,
                &err,
            )
            .attach(&mut response);
            response
        }
    }
}

/// Serve `router` until SIGINT/SIGTERM, then allow in-flight requests up to
/// `grace` to finish.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    grace: Duration,
) -> Result<(), InfraError> {
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    let server = axum::serve(listener, router).with_graceful_shutdown(async move {
        shutdown_signal().await;
        info!(
            grace_seconds = grace.as_secs(),
            "shutdown requested, draining connections"
        );
        let _ = shutdown_tx.send(true);
    });

    let deadline = async move {
        if shutdown_rx.wait_for(|requested| *requested).await.is_err() {
            std::future::pending::<()>().await;
        }
        tokio::time::sleep(grace).await;
    };

    tokio::select! {
        result = server.into_future() => result.map_err(InfraError::from),
        () = deadline => {
            warn!("graceful shutdown timed out, dropping remaining connections");
            Ok(())
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to install SIGTERM handler");
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
}
