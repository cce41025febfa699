use std::collections::HashMap;

use uuid::Uuid;

use crate::application::pagination::PageRequest;
use crate::application::repos::PostQueryFilter;
use crate::domain::entities::{PostRecord, PostWithCategories};
use crate::domain::error::DomainError;
use crate::domain::posts::normalize_category_slugs;

use super::service::PostService;
use super::types::{
    ListPostsQuery, PostListing, PostServiceError, SEARCH_MAX_LEN, SEARCH_MIN_LEN,
};

impl PostService {
    /// One page of the feed. Category membership is loaded separately for the
    /// posts on the page so a category filter never trims the lists returned.
    pub async fn list_posts(&self, query: ListPostsQuery) -> Result<PostListing, PostServiceError> {
        let page = PageRequest::new(query.page, query.limit)?;
        let filter = PostQueryFilter {
            search: normalize_search(query.search)?,
            categories: normalize_category_slugs(&query.categories),
        };

        let posts = self.reader.list_posts(&filter, page).await?;

        let ids: Vec<Uuid> = posts.items.iter().map(|post| post.id).collect();
        let mut memberships = if ids.is_empty() {
            HashMap::new()
        } else {
            self.reader.list_categories_for_posts(&ids).await?
        };

        Ok(posts.map(|post| {
            let categories = memberships.remove(&post.id).unwrap_or_default();
            PostWithCategories { post, categories }
        }))
    }

    pub async fn find_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<PostWithCategories>, PostServiceError> {
        let slug = slug.trim();
        if slug.is_empty() {
            return Err(DomainError::missing("slug").into());
        }

        match self.reader.find_by_slug(slug).await? {
            Some(post) => self.with_categories(post).await.map(Some),
            None => Ok(None),
        }
    }

    pub(crate) async fn with_categories(
        &self,
        post: PostRecord,
    ) -> Result<PostWithCategories, PostServiceError> {
        let mut memberships = self.reader.list_categories_for_posts(&[post.id]).await?;
        let categories = memberships.remove(&post.id).unwrap_or_default();
        Ok(PostWithCategories { post, categories })
    }
}

fn normalize_search(search: Option<String>) -> Result<Option<String>, DomainError> {
    let Some(search) = search else {
        return Ok(None);
    };
    let trimmed = search.trim();
    let length = trimmed.chars().count();

    if length > SEARCH_MAX_LEN {
        return Err(DomainError::validation(
            "search",
            format!("must be at most {SEARCH_MAX_LEN} characters"),
        ));
    }
    if length < SEARCH_MIN_LEN {
        return Ok(None);
    }
    Ok(Some(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_character_search_is_ignored() {
        assert_eq!(normalize_search(Some(" a ".into())), Ok(None));
        assert_eq!(normalize_search(None), Ok(None));
    }

    #[test]
    fn search_is_trimmed() {
        assert_eq!(
            normalize_search(Some("  rust ".into())),
            Ok(Some("rust".into()))
        );
    }

    #[test]
    fn overlong_search_is_rejected() {
        let long = "x".repeat(SEARCH_MAX_LEN + 1);
        assert!(normalize_search(Some(long)).is_err());
    }
}
