use thiserror::Error;
use uuid::Uuid;

use crate::application::pagination::{OffsetPage, PaginationError};
use crate::application::repos::RepoError;
use crate::domain::entities::PostWithCategories;
use crate::domain::error::DomainError;

pub const SEARCH_MAX_LEN: usize = 100;
/// Shorter search terms are ignored rather than matched.
pub const SEARCH_MIN_LEN: usize = 2;

#[derive(Debug, Error)]
pub enum PostServiceError {
    #[error(transparent)]
    Validation(#[from] DomainError),
    #[error(transparent)]
    Pagination(#[from] PaginationError),
    #[error("post `{0}` not found")]
    NotFound(String),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

pub type PostListing = OffsetPage<PostWithCategories>;

#[derive(Debug, Clone)]
pub struct ListPostsQuery {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct CreatePostCommand {
    pub title: String,
    pub content: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub banner: Option<String>,
    pub thumbnail: Option<String>,
    pub published: bool,
    pub categories: Vec<String>,
}

/// Partial update; see [`crate::application::repos::UpdatePostParams`] for
/// the meaning of the nested options.
#[derive(Debug, Clone, Default)]
pub struct UpdatePostCommand {
    pub id: Uuid,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub description: Option<Option<String>>,
    pub banner: Option<Option<String>>,
    pub thumbnail: Option<Option<String>>,
    pub published: Option<bool>,
    pub categories: Option<Vec<String>>,
}
