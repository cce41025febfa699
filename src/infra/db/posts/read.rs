use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::QueryBuilder;
use uuid::Uuid;

use crate::application::pagination::{OffsetPage, PageRequest};
use crate::application::repos::{PostQueryFilter, PostsRepo, RepoError};
use crate::domain::entities::{CategoryRecord, PostRecord};

use super::POST_COLUMNS_P;
use super::types::{PostCategoryRow, PostRow};
use crate::infra::db::{PostgresRepositories, map_sqlx_error};

#[async_trait]
impl PostsRepo for PostgresRepositories {
    async fn list_posts(
        &self,
        filter: &PostQueryFilter,
        page: PageRequest,
    ) -> Result<OffsetPage<PostRecord>, RepoError> {
        let offset = i64::try_from(page.offset())
            .map_err(|_| RepoError::InvalidInput {
                message: "page offset out of range".to_string(),
            })?;

        let mut qb = QueryBuilder::new("SELECT ");
        qb.push(POST_COLUMNS_P);
        qb.push(" FROM posts p WHERE 1=1 ");
        Self::apply_post_filter(&mut qb, filter);
        qb.push(" ORDER BY p.created_at DESC, p.id DESC LIMIT ");
        qb.push_bind(i64::from(page.fetch_limit()));
        qb.push(" OFFSET ");
        qb.push_bind(offset);

        let rows = qb
            .build_query_as::<PostRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        let records = rows.into_iter().map(PostRecord::from).collect();
        Ok(OffsetPage::from_overfetch(records, page))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError> {
        let sql = format!("SELECT {POST_COLUMNS_P} FROM posts p WHERE p.slug = $1");
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(slug)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(PostRecord::from))
    }

    async fn list_categories_for_posts(
        &self,
        post_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<CategoryRecord>>, RepoError> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, PostCategoryRow>(
            r#"
            SELECT pc.post_id, c.id, c.name, c.slug
            FROM post_categories pc
            INNER JOIN categories c ON c.id = pc.category_id
            WHERE pc.post_id = ANY($1)
            ORDER BY pc.post_id, c.name, c.id
            "#,
        )
        .bind(post_ids)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        let mut grouped: HashMap<Uuid, Vec<CategoryRecord>> = HashMap::new();
        for row in rows {
            let (post_id, category) = row.into_parts();
            grouped.entry(post_id).or_default().push(category);
        }
        Ok(grouped)
    }
}
