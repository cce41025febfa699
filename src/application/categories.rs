use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::application::repos::{
    CategoriesRepo, CategoriesWriteRepo, CreateCategoryParams, RepoError, UpdateCategoryParams,
};
use crate::domain::entities::CategoryRecord;
use crate::domain::error::DomainError;
use crate::domain::posts::{CATEGORY_NAME_MAX_LEN, require_text};
use crate::domain::slug::{CATEGORY_SLUG_MAX_LEN, validate_slug};

#[derive(Debug, Error)]
pub enum CategoryServiceError {
    #[error(transparent)]
    Validation(#[from] DomainError),
    #[error("category `{0}` not found")]
    NotFound(i32),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone)]
pub struct CreateCategoryCommand {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone)]
pub struct UpdateCategoryCommand {
    pub id: i32,
    pub name: String,
    pub slug: String,
}

#[derive(Clone)]
pub struct CategoryService {
    reader: Arc<dyn CategoriesRepo>,
    writer: Arc<dyn CategoriesWriteRepo>,
}

impl CategoryService {
    pub fn new(reader: Arc<dyn CategoriesRepo>, writer: Arc<dyn CategoriesWriteRepo>) -> Self {
        Self { reader, writer }
    }

    pub async fn list_all(&self) -> Result<Vec<CategoryRecord>, CategoryServiceError> {
        self.reader
            .list_all()
            .await
            .map_err(CategoryServiceError::from)
    }

    pub async fn add_category(
        &self,
        command: CreateCategoryCommand,
    ) -> Result<CategoryRecord, CategoryServiceError> {
        let params = CreateCategoryParams {
            name: require_text(&command.name, "name", Some(CATEGORY_NAME_MAX_LEN))?,
            slug: validate_slug(&command.slug, "slug", CATEGORY_SLUG_MAX_LEN)?,
        };

        let category = self.writer.create_category(params).await?;
        info!(
            category_id = category.id,
            slug = %category.slug,
            "category created"
        );
        Ok(category)
    }

    pub async fn update_category(
        &self,
        command: UpdateCategoryCommand,
    ) -> Result<CategoryRecord, CategoryServiceError> {
        let UpdateCategoryCommand { id, name, slug } = command;

        let params = UpdateCategoryParams {
            id,
            name: require_text(&name, "name", Some(CATEGORY_NAME_MAX_LEN))?,
            slug: validate_slug(&slug, "slug", CATEGORY_SLUG_MAX_LEN)?,
        };

        let category = self
            .writer
            .update_category(params)
            .await
            .map_err(|err| match err {
                RepoError::NotFound => CategoryServiceError::NotFound(id),
                other => CategoryServiceError::Repo(other),
            })?;

        info!(
            category_id = category.id,
            slug = %category.slug,
            "category updated"
        );
        Ok(category)
    }
}
