//! `posts.*` procedures

use axum::Json;
use axum::extract::State;

use crate::domain::entities::{PostRecord, PostWithCategories};
use crate::infra::http::rpc::error::RpcError;
use crate::infra::http::rpc::models::{
    PostsAllInput, PostsAllOutput, PostsBySlugInput, PostsCreateInput, PostsDeleteInput,
    PostsUpdateInput, RpcInput,
};
use crate::infra::http::rpc::state::RpcState;

pub async fn all(
    State(state): State<RpcState>,
    RpcInput(input): RpcInput<PostsAllInput>,
) -> Result<Json<PostsAllOutput>, RpcError> {
    let listing = state.posts.list_posts(input.into()).await?;
    Ok(Json(PostsAllOutput::from(listing)))
}

pub async fn by_slug(
    State(state): State<RpcState>,
    RpcInput(input): RpcInput<PostsBySlugInput>,
) -> Result<Json<PostWithCategories>, RpcError> {
    match state.posts.find_by_slug(&input.slug).await? {
        Some(post) => Ok(Json(post)),
        None => Err(RpcError::not_found(format!("{} not found", input.slug))),
    }
}

pub async fn create(
    State(state): State<RpcState>,
    RpcInput(input): RpcInput<PostsCreateInput>,
) -> Result<Json<PostRecord>, RpcError> {
    let post = state.posts.create_post(input.into()).await?;
    Ok(Json(post))
}

pub async fn update(
    State(state): State<RpcState>,
    RpcInput(input): RpcInput<PostsUpdateInput>,
) -> Result<Json<PostRecord>, RpcError> {
    let post = state.posts.update_post(input.into_command()?).await?;
    Ok(Json(post))
}

pub async fn delete(
    State(state): State<RpcState>,
    RpcInput(input): RpcInput<PostsDeleteInput>,
) -> Result<Json<bool>, RpcError> {
    let id = input
        .id
        .ok_or_else(|| RpcError::bad_request("Post id is required"))?;
    let deleted = state.posts.delete_post(id).await?;
    Ok(Json(deleted))
}
