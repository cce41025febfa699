//! Repository traits describing persistence adapters.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::application::pagination::{OffsetPage, PageRequest};
use crate::domain::entities::{CategoryRecord, PostRecord};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("unknown category slugs: {}", slugs.join(", "))]
    UnknownCategories { slugs: Vec<String> },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[derive(Debug, Clone, Default)]
pub struct PostQueryFilter {
    /// Case-insensitive title substring.
    pub search: Option<String>,
    /// Matches posts linked to any of these category slugs; empty means no filter.
    pub categories: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct CreatePostParams {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub description: Option<String>,
    pub banner: Option<String>,
    pub thumbnail: Option<String>,
    pub published: bool,
    pub category_slugs: Vec<String>,
}

/// Partial post update. `None` leaves a column untouched; for nullable
/// columns `Some(None)` clears the value.
#[derive(Debug, Clone, Default)]
pub struct UpdatePostParams {
    pub id: Uuid,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub description: Option<Option<String>>,
    pub banner: Option<Option<String>>,
    pub thumbnail: Option<Option<String>>,
    pub published: Option<bool>,
    pub category_slugs: Option<Vec<String>>,
}

impl UpdatePostParams {
    pub fn has_field_changes(&self) -> bool {
        self.title.is_some()
            || self.slug.is_some()
            || self.content.is_some()
            || self.description.is_some()
            || self.banner.is_some()
            || self.thumbnail.is_some()
            || self.published.is_some()
    }
}

#[async_trait]
pub trait PostsRepo: Send + Sync {
    /// Posts ordered by `created_at DESC, id DESC`, overfetched by one row.
    async fn list_posts(
        &self,
        filter: &PostQueryFilter,
        page: PageRequest,
    ) -> Result<OffsetPage<PostRecord>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError>;

    /// Full category membership for each of `post_ids`, ordered by name.
    /// Posts without categories are absent from the map.
    async fn list_categories_for_posts(
        &self,
        post_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<CategoryRecord>>, RepoError>;
}

#[async_trait]
pub trait PostsWriteRepo: Send + Sync {
    /// Insert the post and its category links atomically.
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError>;

    /// Apply field changes and, when requested, re-sync category links in a
    /// single transaction. Fails with [`RepoError::NotFound`] for unknown ids.
    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError>;

    /// Returns `true` when a post was removed.
    async fn delete_post(&self, id: Uuid) -> Result<bool, RepoError>;
}

#[derive(Debug, Clone)]
pub struct CreateCategoryParams {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone)]
pub struct UpdateCategoryParams {
    pub id: i32,
    pub name: String,
    pub slug: String,
}

#[async_trait]
pub trait CategoriesRepo: Send + Sync {
    async fn list_all(&self) -> Result<Vec<CategoryRecord>, RepoError>;
}

#[async_trait]
pub trait CategoriesWriteRepo: Send + Sync {
    async fn create_category(
        &self,
        params: CreateCategoryParams,
    ) -> Result<CategoryRecord, RepoError>;

    /// Fails with [`RepoError::NotFound`] for unknown ids.
    async fn update_category(
        &self,
        params: UpdateCategoryParams,
    ) -> Result<CategoryRecord, RepoError>;
}

#[async_trait]
pub trait HealthRepo: Send + Sync {
    async fn ping(&self) -> Result<(), RepoError>;
}
