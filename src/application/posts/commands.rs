use tracing::info;
use uuid::Uuid;

use crate::application::repos::{CreatePostParams, RepoError, UpdatePostParams};
use crate::domain::entities::PostRecord;
use crate::domain::error::DomainError;
use crate::domain::posts::{TITLE_MAX_LEN, normalize_category_slugs, optional_text, require_text};
use crate::domain::slug::{POST_SLUG_MAX_LEN, generate_post_slug, validate_slug};

use super::service::PostService;
use super::types::{CreatePostCommand, PostServiceError, UpdatePostCommand};

impl PostService {
    pub async fn create_post(
        &self,
        command: CreatePostCommand,
    ) -> Result<PostRecord, PostServiceError> {
        let title = require_text(&command.title, "title", Some(TITLE_MAX_LEN))?;
        let content = require_text(&command.content, "content", None)?;

        let slug = match command.slug.as_deref().map(str::trim) {
            Some(slug) if !slug.is_empty() => validate_slug(slug, "slug", POST_SLUG_MAX_LEN)?,
            _ => generate_post_slug(&title),
        };

        let category_slugs = required_categories(&command.categories)?;

        let params = CreatePostParams {
            title,
            slug,
            content,
            description: optional_text(command.description),
            banner: optional_text(command.banner),
            thumbnail: optional_text(command.thumbnail),
            published: command.published,
            category_slugs,
        };

        let post = self.writer.create_post(params).await?;
        info!(
            post_id = %post.id,
            slug = %post.slug,
            "post created"
        );
        Ok(post)
    }

    pub async fn update_post(
        &self,
        command: UpdatePostCommand,
    ) -> Result<PostRecord, PostServiceError> {
        let UpdatePostCommand {
            id,
            title,
            slug,
            content,
            description,
            banner,
            thumbnail,
            published,
            categories,
        } = command;

        let params = UpdatePostParams {
            id,
            title: title
                .map(|title| require_text(&title, "title", Some(TITLE_MAX_LEN)))
                .transpose()?,
            slug: slug
                .map(|slug| validate_slug(&slug, "slug", POST_SLUG_MAX_LEN))
                .transpose()?,
            content: content
                .map(|content| require_text(&content, "content", None))
                .transpose()?,
            description: description.map(optional_text),
            banner: banner.map(optional_text),
            thumbnail: thumbnail.map(optional_text),
            published,
            category_slugs: categories
                .map(|categories| required_categories(&categories))
                .transpose()?,
        };
        let resynced = params.category_slugs.is_some();

        let post = self
            .writer
            .update_post(params)
            .await
            .map_err(|err| match err {
                RepoError::NotFound => PostServiceError::NotFound(id.to_string()),
                other => PostServiceError::Repo(other),
            })?;

        info!(
            post_id = %post.id,
            categories_resynced = resynced,
            "post updated"
        );
        Ok(post)
    }

    pub async fn delete_post(&self, id: Uuid) -> Result<bool, PostServiceError> {
        let deleted = self.writer.delete_post(id).await?;
        info!(post_id = %id, deleted, "post delete requested");
        Ok(deleted)
    }
}

fn required_categories(categories: &[String]) -> Result<Vec<String>, DomainError> {
    let slugs = normalize_category_slugs(categories);
    if slugs.is_empty() {
        return Err(DomainError::validation(
            "categories",
            "must contain at least one category",
        ));
    }
    Ok(slugs)
}
