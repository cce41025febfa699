use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::entities::{CategoryRecord, PostRecord};

#[derive(sqlx::FromRow)]
pub(super) struct PostRow {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub description: Option<String>,
    pub banner: Option<String>,
    pub thumbnail: Option<String>,
    pub published: bool,
    pub created_at: OffsetDateTime,
}

impl From<PostRow> for PostRecord {
    fn from(row: PostRow) -> Self {
        PostRecord {
            id: row.id,
            title: row.title,
            slug: row.slug,
            content: row.content,
            description: row.description,
            banner: row.banner,
            thumbnail: row.thumbnail,
            published: row.published,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct PostCategoryRow {
    pub post_id: Uuid,
    pub id: i32,
    pub name: String,
    pub slug: String,
}

impl PostCategoryRow {
    pub fn into_parts(self) -> (Uuid, CategoryRecord) {
        (
            self.post_id,
            CategoryRecord {
                id: self.id,
                name: self.name,
                slug: self.slug,
            },
        )
    }
}
