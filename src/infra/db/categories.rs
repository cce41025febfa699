use async_trait::async_trait;

use crate::application::repos::{
    CategoriesRepo, CategoriesWriteRepo, CreateCategoryParams, RepoError, UpdateCategoryParams,
};
use crate::domain::entities::CategoryRecord;

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: i32,
    name: String,
    slug: String,
}

impl From<CategoryRow> for CategoryRecord {
    fn from(row: CategoryRow) -> Self {
        CategoryRecord {
            id: row.id,
            name: row.name,
            slug: row.slug,
        }
    }
}

#[async_trait]
impl CategoriesRepo for PostgresRepositories {
    async fn list_all(&self) -> Result<Vec<CategoryRecord>, RepoError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, name, slug FROM categories ORDER BY name, id",
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(CategoryRecord::from).collect())
    }
}

#[async_trait]
impl CategoriesWriteRepo for PostgresRepositories {
    async fn create_category(
        &self,
        params: CreateCategoryParams,
    ) -> Result<CategoryRecord, RepoError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            INSERT INTO categories (name, slug)
            VALUES ($1, $2)
            RETURNING id, name, slug
            "#,
        )
        .bind(params.name)
        .bind(params.slug)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(CategoryRecord::from(row))
    }

    async fn update_category(
        &self,
        params: UpdateCategoryParams,
    ) -> Result<CategoryRecord, RepoError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            UPDATE categories
            SET name = $2, slug = $3
            WHERE id = $1
            RETURNING id, name, slug
            "#,
        )
        .bind(params.id)
        .bind(params.name)
        .bind(params.slug)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        row.map(CategoryRecord::from).ok_or(RepoError::NotFound)
    }
}
