//! Domain entities mirrored from persistent storage.

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub description: Option<String>,
    pub banner: Option<String>,
    pub thumbnail: Option<String>,
    pub published: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CategoryRecord {
    pub id: i32,
    pub name: String,
    pub slug: String,
}

/// A post together with every category currently linked to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostWithCategories {
    pub post: PostRecord,
    pub categories: Vec<CategoryRecord>,
}

impl PostWithCategories {
    pub fn category_slugs(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.slug.as_str()).collect()
    }
}
