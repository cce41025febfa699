use async_trait::async_trait;
use sqlx::{PgConnection, Postgres, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

use crate::application::repos::{CreatePostParams, PostsWriteRepo, RepoError, UpdatePostParams};
use crate::domain::entities::PostRecord;
use crate::domain::posts::CategorySyncPlan;

use super::POST_COLUMNS;
use super::types::PostRow;
use crate::infra::db::{PostgresRepositories, map_sqlx_error};

#[async_trait]
impl PostsWriteRepo for PostgresRepositories {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        let CreatePostParams {
            title,
            slug,
            content,
            description,
            banner,
            thumbnail,
            published,
            category_slugs,
        } = params;

        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        let sql = format!(
            "INSERT INTO posts (id, title, slug, content, description, banner, thumbnail, published) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {POST_COLUMNS}"
        );
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(title)
            .bind(slug)
            .bind(content)
            .bind(description)
            .bind(banner)
            .bind(thumbnail)
            .bind(published)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        let category_ids = resolve_category_ids(&mut *tx, &category_slugs).await?;
        insert_links(&mut *tx, row.id, &category_ids).await?;

        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(PostRecord::from(row))
    }

    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError> {
        let has_field_changes = params.has_field_changes();
        let UpdatePostParams {
            id,
            title,
            slug,
            content,
            description,
            banner,
            thumbnail,
            published,
            category_slugs,
        } = params;

        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        let row = if has_field_changes {
            let mut qb = QueryBuilder::<Postgres>::new("UPDATE posts SET ");
            {
                let mut set = qb.separated(", ");
                if let Some(title) = title {
                    set.push("title = ");
                    set.push_bind_unseparated(title);
                }
                if let Some(slug) = slug {
                    set.push("slug = ");
                    set.push_bind_unseparated(slug);
                }
                if let Some(content) = content {
                    set.push("content = ");
                    set.push_bind_unseparated(content);
                }
                if let Some(description) = description {
                    set.push("description = ");
                    set.push_bind_unseparated(description);
                }
                if let Some(banner) = banner {
                    set.push("banner = ");
                    set.push_bind_unseparated(banner);
                }
                if let Some(thumbnail) = thumbnail {
                    set.push("thumbnail = ");
                    set.push_bind_unseparated(thumbnail);
                }
                if let Some(published) = published {
                    set.push("published = ");
                    set.push_bind_unseparated(published);
                }
            }
            qb.push(" WHERE id = ");
            qb.push_bind(id);
            qb.push(" RETURNING ");
            qb.push(POST_COLUMNS);

            qb.build_query_as::<PostRow>()
                .fetch_optional(&mut *tx)
                .await
                .map_err(map_sqlx_error)?
        } else {
            // Lock the row so a concurrent delete cannot interleave with the
            // category sync below.
            let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1 FOR UPDATE");
            sqlx::query_as::<_, PostRow>(&sql)
                .bind(id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(map_sqlx_error)?
        };

        let row = row.ok_or(RepoError::NotFound)?;

        if let Some(slugs) = category_slugs {
            sync_categories(&mut *tx, id, &slugs).await?;
        }

        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(PostRecord::from(row))
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}

/// Resolve category slugs to ids, preserving request order. Any slug without a
/// matching category fails the whole lookup.
async fn resolve_category_ids(
    conn: &mut PgConnection,
    slugs: &[String],
) -> Result<Vec<i32>, RepoError> {
    if slugs.is_empty() {
        return Ok(Vec::new());
    }

    let rows: Vec<(i32, String)> =
        sqlx::query_as("SELECT id, slug FROM categories WHERE slug = ANY($1)")
            .bind(slugs)
            .fetch_all(&mut *conn)
            .await
            .map_err(map_sqlx_error)?;

    let mut ids = Vec::with_capacity(slugs.len());
    let mut missing = Vec::new();
    for slug in slugs {
        match rows.iter().find(|(_, found)| found == slug) {
            Some((id, _)) => ids.push(*id),
            None => missing.push(slug.clone()),
        }
    }

    if !missing.is_empty() {
        return Err(RepoError::UnknownCategories { slugs: missing });
    }
    Ok(ids)
}

async fn insert_links(
    conn: &mut PgConnection,
    post_id: Uuid,
    category_ids: &[i32],
) -> Result<(), RepoError> {
    if category_ids.is_empty() {
        return Ok(());
    }

    sqlx::query(
        r#"
        INSERT INTO post_categories (post_id, category_id)
        SELECT $1, category_id
        FROM UNNEST($2::int4[]) AS category_id
        ON CONFLICT (post_id, category_id) DO NOTHING
        "#,
    )
    .bind(post_id)
    .bind(category_ids)
    .execute(&mut *conn)
    .await
    .map_err(map_sqlx_error)?;

    Ok(())
}

async fn sync_categories(
    conn: &mut PgConnection,
    post_id: Uuid,
    slugs: &[String],
) -> Result<(), RepoError> {
    let desired = resolve_category_ids(&mut *conn, slugs).await?;

    let current: Vec<i32> = sqlx::query_scalar(
        "SELECT category_id FROM post_categories WHERE post_id = $1 FOR UPDATE",
    )
    .bind(post_id)
    .fetch_all(&mut *conn)
    .await
    .map_err(map_sqlx_error)?;

    let plan = CategorySyncPlan::between(&current, &desired);
    if plan.is_noop() {
        return Ok(());
    }

    if !plan.to_remove.is_empty() {
        sqlx::query("DELETE FROM post_categories WHERE post_id = $1 AND category_id = ANY($2)")
            .bind(post_id)
            .bind(&plan.to_remove)
            .execute(&mut *conn)
            .await
            .map_err(map_sqlx_error)?;
    }
    insert_links(&mut *conn, post_id, &plan.to_add).await?;

    debug!(
        %post_id,
        added = ?plan.to_add,
        removed = ?plan.to_remove,
        "post categories synchronised"
    );
    Ok(())
}
