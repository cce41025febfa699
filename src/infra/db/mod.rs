//! Postgres-backed repository implementations.

mod categories;
mod posts;
mod util;

pub use util::{escape_like, map_sqlx_error};

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use sqlx::{
    Postgres, QueryBuilder, Transaction,
    postgres::{PgPool, PgPoolOptions},
    query,
};

use crate::application::repos::{HealthRepo, PostQueryFilter, RepoError};

#[derive(Clone)]
pub struct PostgresRepositories {
    pool: Arc<PgPool>,
}

impl PostgresRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }

    pub async fn connect(
        url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<PgPool, sqlx::Error> {
        PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(url)
            .await
    }

    pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(pool).await
    }

    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        query("SELECT 1").execute(self.pool()).await.map(|_| ())
    }

    fn apply_post_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &PostQueryFilter) {
        if let Some(search) = filter.search.as_ref() {
            qb.push(" AND p.title ILIKE ");
            qb.push_bind(format!("%{}%", escape_like(search)));
            qb.push(" ESCAPE '\\' ");
        }

        if !filter.categories.is_empty() {
            qb.push(
                " AND EXISTS (SELECT 1 FROM post_categories fpc \
                 INNER JOIN categories fc ON fc.id = fpc.category_id \
                 WHERE fpc.post_id = p.id AND fc.slug = ANY(",
            );
            qb.push_bind(filter.categories.clone());
            qb.push(")) ");
        }
    }
}

#[async_trait]
impl HealthRepo for PostgresRepositories {
    async fn ping(&self) -> Result<(), RepoError> {
        self.health_check().await.map_err(map_sqlx_error)
    }
}
