//! `categories.*` procedures

use axum::Json;
use axum::extract::State;

use crate::domain::entities::CategoryRecord;
use crate::infra::http::rpc::error::RpcError;
use crate::infra::http::rpc::models::{CategoriesAddInput, CategoriesUpdateInput, RpcInput};
use crate::infra::http::rpc::state::RpcState;

pub async fn all(State(state): State<RpcState>) -> Result<Json<Vec<CategoryRecord>>, RpcError> {
    let categories = state.categories.list_all().await?;
    Ok(Json(categories))
}

pub async fn add(
    State(state): State<RpcState>,
    RpcInput(input): RpcInput<CategoriesAddInput>,
) -> Result<Json<CategoryRecord>, RpcError> {
    let category = state.categories.add_category(input.into()).await?;
    Ok(Json(category))
}

pub async fn update(
    State(state): State<RpcState>,
    RpcInput(input): RpcInput<CategoriesUpdateInput>,
) -> Result<Json<CategoryRecord>, RpcError> {
    let category = state
        .categories
        .update_category(input.into_command()?)
        .await?;
    Ok(Json(category))
}
