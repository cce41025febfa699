pub mod categories;
pub mod posts;

use axum::http::Uri;

use super::error::RpcError;

pub async fn unknown_procedure(uri: Uri) -> RpcError {
    let procedure = uri.path().strip_prefix("/rpc/").unwrap_or(uri.path());
    RpcError::not_found(format!("No procedure named `{procedure}`."))
}
