//! Wire shapes for RPC procedure inputs and outputs. Field names are camelCase.

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::application::categories::{CreateCategoryCommand, UpdateCategoryCommand};
use crate::application::pagination::{DEFAULT_LIMIT, DEFAULT_PAGE};
use crate::application::posts::{
    CreatePostCommand, ListPostsQuery, PostListing, UpdatePostCommand,
};
use crate::domain::entities::PostWithCategories;

use super::error::RpcError;

/// JSON procedure input. An empty body is read as `{}` so procedures whose
/// fields are all optional can be called without one.
#[derive(Debug)]
pub struct RpcInput<T>(pub T);

impl<S, T> FromRequest<S> for RpcInput<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = RpcError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| RpcError::invalid_input(rejection.body_text()))?;

        let body: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
            b"{}"
        } else {
            &bytes
        };

        serde_json::from_slice(body)
            .map(RpcInput)
            .map_err(|err| RpcError::invalid_input(err.to_string()))
    }
}

/// Distinguish an absent field (`None`) from an explicit `null` (`Some(None)`).
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn default_published() -> bool {
    true
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PostsAllInput {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub categories: Option<Vec<String>>,
}

impl From<PostsAllInput> for ListPostsQuery {
    fn from(input: PostsAllInput) -> Self {
        ListPostsQuery {
            page: input.page.unwrap_or(DEFAULT_PAGE),
            limit: input.limit.unwrap_or(DEFAULT_LIMIT),
            search: input.search,
            categories: input.categories.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostsAllOutput {
    pub posts: Vec<PostWithCategories>,
    /// Previous page number, or `-1`.
    pub prev: i64,
    /// Next page number, or `-1`.
    pub next: i64,
}

impl From<PostListing> for PostsAllOutput {
    fn from(listing: PostListing) -> Self {
        let prev = listing.prev_indicator();
        let next = listing.next_indicator();
        PostsAllOutput {
            posts: listing.items,
            prev,
            next,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostsBySlugInput {
    pub slug: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostsCreateInput {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub banner: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default = "default_published")]
    pub published: bool,
    #[serde(default)]
    pub categories: Vec<String>,
}

impl From<PostsCreateInput> for CreatePostCommand {
    fn from(input: PostsCreateInput) -> Self {
        CreatePostCommand {
            title: input.title,
            content: input.content,
            slug: input.slug,
            description: input.description,
            banner: input.banner,
            thumbnail: input.thumbnail,
            published: input.published,
            categories: input.categories,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostsUpdateInput {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub banner: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub thumbnail: Option<Option<String>>,
    #[serde(default)]
    pub published: Option<bool>,
    #[serde(default)]
    pub categories: Option<Vec<String>>,
}

impl PostsUpdateInput {
    pub fn into_command(self) -> Result<UpdatePostCommand, RpcError> {
        let id = self
            .id
            .ok_or_else(|| RpcError::bad_request("Post id is required"))?;

        Ok(UpdatePostCommand {
            id,
            title: self.title,
            slug: self.slug,
            content: self.content,
            description: self.description,
            banner: self.banner,
            thumbnail: self.thumbnail,
            published: self.published,
            categories: self.categories,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostsDeleteInput {
    #[serde(default)]
    pub id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoriesAddInput {
    pub name: String,
    pub slug: String,
}

impl From<CategoriesAddInput> for CreateCategoryCommand {
    fn from(input: CategoriesAddInput) -> Self {
        CreateCategoryCommand {
            name: input.name,
            slug: input.slug,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoriesUpdateInput {
    #[serde(default)]
    pub id: Option<i32>,
    pub name: String,
    pub slug: String,
}

impl CategoriesUpdateInput {
    pub fn into_command(self) -> Result<UpdateCategoryCommand, RpcError> {
        let id = self
            .id
            .ok_or_else(|| RpcError::bad_request("Id is required"))?;

        Ok(UpdateCategoryCommand {
            id,
            name: self.name,
            slug: self.slug,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_input_distinguishes_null_from_absent() {
        let input: PostsUpdateInput = serde_json::from_str(
            r#"{"id":"8d9a7f8e-2b3c-4d5e-8f90-1a2b3c4d5e6f","description":null,"banner":"b.png"}"#,
        )
        .expect("valid input");

        assert_eq!(input.description, Some(None));
        assert_eq!(input.banner, Some(Some("b.png".to_string())));
        assert_eq!(input.thumbnail, None);
    }

    #[test]
    fn update_input_without_id_is_rejected() {
        let input: PostsUpdateInput =
            serde_json::from_str(r#"{"title":"x"}"#).expect("valid input");
        let err = input.into_command().expect_err("missing id");
        assert_eq!(err.message(), "Post id is required");
    }

    #[test]
    fn create_input_defaults_published_to_true() {
        let input: PostsCreateInput =
            serde_json::from_str(r#"{"title":"t","content":"c","categories":["tech"]}"#)
                .expect("valid input");
        assert!(input.published);
    }

    #[test]
    fn list_input_applies_defaults() {
        let input: PostsAllInput = serde_json::from_str("{}").expect("valid input");
        let query = ListPostsQuery::from(input);
        assert_eq!(query.page, DEFAULT_PAGE);
        assert_eq!(query.limit, DEFAULT_LIMIT);
        assert!(query.categories.is_empty());
    }
}
