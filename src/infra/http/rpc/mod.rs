//! Procedure router: every procedure is `POST /rpc/{name}` with a JSON input.

pub mod error;
pub mod handlers;
pub mod models;
pub mod state;

pub use error::{RpcError, codes};
pub use state::RpcState;

use axum::{Router, middleware as axum_middleware, routing::post};

use crate::infra::http::middleware::track_rpc_calls;

pub fn build_rpc_router() -> Router<RpcState> {
    Router::new()
        .route("/rpc/posts.all", post(handlers::posts::all))
        .route("/rpc/posts.bySlug", post(handlers::posts::by_slug))
        .route("/rpc/posts.create", post(handlers::posts::create))
        .route("/rpc/posts.update", post(handlers::posts::update))
        .route("/rpc/posts.delete", post(handlers::posts::delete))
        .route("/rpc/categories.all", post(handlers::categories::all))
        .route("/rpc/categories.add", post(handlers::categories::add))
        .route("/rpc/categories.update", post(handlers::categories::update))
        .route_layer(axum_middleware::from_fn(track_rpc_calls))
}
