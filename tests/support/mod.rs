#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use time::macros::datetime;
use time::{Duration, OffsetDateTime};
use tokio::sync::Mutex;
use uuid::Uuid;

use quill::application::categories::{CategoryService, CreateCategoryCommand};
use quill::application::pagination::{OffsetPage, PageRequest};
use quill::application::posts::PostService;
use quill::application::repos::{
    CategoriesRepo, CategoriesWriteRepo, CreateCategoryParams, CreatePostParams, HealthRepo,
    PostQueryFilter, PostsRepo, PostsWriteRepo, RepoError, UpdateCategoryParams,
    UpdatePostParams,
};
use quill::domain::entities::{CategoryRecord, PostRecord};
use quill::domain::posts::CategorySyncPlan;
use quill::infra::http::RpcState;

const EPOCH: OffsetDateTime = datetime!(2025-01-01 00:00 UTC);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: i64,
    pub post_id: Uuid,
    pub category_id: i32,
}

#[derive(Default)]
struct Tables {
    posts: Vec<PostRecord>,
    categories: Vec<CategoryRecord>,
    links: Vec<Link>,
    next_category_id: i32,
    next_link_id: i64,
    clock: i64,
}

impl Tables {
    fn resolve(&self, slugs: &[String]) -> Result<Vec<i32>, RepoError> {
        let mut ids = Vec::with_capacity(slugs.len());
        let mut missing = Vec::new();
        for slug in slugs {
            match self.categories.iter().find(|c| &c.slug == slug) {
                Some(category) => ids.push(category.id),
                None => missing.push(slug.clone()),
            }
        }
        if missing.is_empty() {
            Ok(ids)
        } else {
            Err(RepoError::UnknownCategories { slugs: missing })
        }
    }

    fn link(&mut self, post_id: Uuid, category_id: i32) {
        if self
            .links
            .iter()
            .any(|l| l.post_id == post_id && l.category_id == category_id)
        {
            return;
        }
        self.next_link_id += 1;
        self.links.push(Link {
            id: self.next_link_id,
            post_id,
            category_id,
        });
    }

    fn slug_taken(&self, slug: &str, except: Option<Uuid>) -> bool {
        self.posts
            .iter()
            .any(|p| p.slug == slug && Some(p.id) != except)
    }
}

/// Repository fake mirroring the Postgres adapter's observable behaviour:
/// unique slugs, cascading deletes, and all-or-nothing writes.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    down: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    pub async fn links_for(&self, post_id: Uuid) -> Vec<Link> {
        let tables = self.tables.lock().await;
        tables
            .links
            .iter()
            .filter(|l| l.post_id == post_id)
            .cloned()
            .collect()
    }

    pub async fn link_count(&self) -> usize {
        self.tables.lock().await.links.len()
    }
}

#[async_trait]
impl PostsRepo for InMemoryStore {
    async fn list_posts(
        &self,
        filter: &PostQueryFilter,
        page: PageRequest,
    ) -> Result<OffsetPage<PostRecord>, RepoError> {
        let tables = self.tables.lock().await;

        let wanted: Vec<i32> = tables
            .categories
            .iter()
            .filter(|c| filter.categories.contains(&c.slug))
            .map(|c| c.id)
            .collect();
        let needle = filter.search.as_ref().map(|s| s.to_lowercase());

        let mut matching: Vec<PostRecord> = tables
            .posts
            .iter()
            .filter(|post| match &needle {
                Some(needle) => post.title.to_lowercase().contains(needle),
                None => true,
            })
            .filter(|post| {
                filter.categories.is_empty()
                    || tables
                        .links
                        .iter()
                        .any(|l| l.post_id == post.id && wanted.contains(&l.category_id))
            })
            .cloned()
            .collect();

        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let rows = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.fetch_limit() as usize)
            .collect();

        Ok(OffsetPage::from_overfetch(rows, page))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError> {
        let tables = self.tables.lock().await;
        Ok(tables.posts.iter().find(|p| p.slug == slug).cloned())
    }

    async fn list_categories_for_posts(
        &self,
        post_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<CategoryRecord>>, RepoError> {
        let tables = self.tables.lock().await;
        let mut grouped: HashMap<Uuid, Vec<CategoryRecord>> = HashMap::new();

        for link in tables.links.iter().filter(|l| post_ids.contains(&l.post_id)) {
            if let Some(category) = tables.categories.iter().find(|c| c.id == link.category_id) {
                grouped
                    .entry(link.post_id)
                    .or_default()
                    .push(category.clone());
            }
        }
        for categories in grouped.values_mut() {
            categories.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        }
        Ok(grouped)
    }
}

#[async_trait]
impl PostsWriteRepo for InMemoryStore {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        let mut tables = self.tables.lock().await;

        if tables.slug_taken(&params.slug, None) {
            return Err(RepoError::Duplicate {
                constraint: "posts_slug_key".into(),
            });
        }
        let category_ids = tables.resolve(&params.category_slugs)?;

        tables.clock += 1;
        let post = PostRecord {
            id: Uuid::new_v4(),
            title: params.title,
            slug: params.slug,
            content: params.content,
            description: params.description,
            banner: params.banner,
            thumbnail: params.thumbnail,
            published: params.published,
            created_at: EPOCH + Duration::seconds(tables.clock),
        };
        tables.posts.push(post.clone());
        for category_id in category_ids {
            tables.link(post.id, category_id);
        }
        Ok(post)
    }

    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError> {
        let mut tables = self.tables.lock().await;

        let index = tables
            .posts
            .iter()
            .position(|p| p.id == params.id)
            .ok_or(RepoError::NotFound)?;

        if let Some(slug) = params.slug.as_deref() {
            if tables.slug_taken(slug, Some(params.id)) {
                return Err(RepoError::Duplicate {
                    constraint: "posts_slug_key".into(),
                });
            }
        }
        let desired = match params.category_slugs.as_ref() {
            Some(slugs) => Some(tables.resolve(slugs)?),
            None => None,
        };

        let post = &mut tables.posts[index];
        if let Some(title) = params.title {
            post.title = title;
        }
        if let Some(slug) = params.slug {
            post.slug = slug;
        }
        if let Some(content) = params.content {
            post.content = content;
        }
        if let Some(description) = params.description {
            post.description = description;
        }
        if let Some(banner) = params.banner {
            post.banner = banner;
        }
        if let Some(thumbnail) = params.thumbnail {
            post.thumbnail = thumbnail;
        }
        if let Some(published) = params.published {
            post.published = published;
        }
        let updated = post.clone();

        if let Some(desired) = desired {
            let current: Vec<i32> = tables
                .links
                .iter()
                .filter(|l| l.post_id == params.id)
                .map(|l| l.category_id)
                .collect();
            let plan = CategorySyncPlan::between(&current, &desired);
            tables
                .links
                .retain(|l| !(l.post_id == params.id && plan.to_remove.contains(&l.category_id)));
            for category_id in plan.to_add {
                tables.link(params.id, category_id);
            }
        }

        Ok(updated)
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool, RepoError> {
        let mut tables = self.tables.lock().await;
        let before = tables.posts.len();
        tables.posts.retain(|p| p.id != id);
        let deleted = tables.posts.len() != before;
        if deleted {
            tables.links.retain(|l| l.post_id != id);
        }
        Ok(deleted)
    }
}

#[async_trait]
impl CategoriesRepo for InMemoryStore {
    async fn list_all(&self) -> Result<Vec<CategoryRecord>, RepoError> {
        let tables = self.tables.lock().await;
        let mut categories = tables.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(categories)
    }
}

#[async_trait]
impl CategoriesWriteRepo for InMemoryStore {
    async fn create_category(
        &self,
        params: CreateCategoryParams,
    ) -> Result<CategoryRecord, RepoError> {
        let mut tables = self.tables.lock().await;
        if tables.categories.iter().any(|c| c.slug == params.slug) {
            return Err(RepoError::Duplicate {
                constraint: "categories_slug_key".into(),
            });
        }
        tables.next_category_id += 1;
        let category = CategoryRecord {
            id: tables.next_category_id,
            name: params.name,
            slug: params.slug,
        };
        tables.categories.push(category.clone());
        Ok(category)
    }

    async fn update_category(
        &self,
        params: UpdateCategoryParams,
    ) -> Result<CategoryRecord, RepoError> {
        let mut tables = self.tables.lock().await;
        if tables
            .categories
            .iter()
            .any(|c| c.slug == params.slug && c.id != params.id)
        {
            return Err(RepoError::Duplicate {
                constraint: "categories_slug_key".into(),
            });
        }
        let category = tables
            .categories
            .iter_mut()
            .find(|c| c.id == params.id)
            .ok_or(RepoError::NotFound)?;
        category.name = params.name;
        category.slug = params.slug;
        Ok(category.clone())
    }
}

#[async_trait]
impl HealthRepo for InMemoryStore {
    async fn ping(&self) -> Result<(), RepoError> {
        if self.down.load(Ordering::SeqCst) {
            Err(RepoError::Timeout)
        } else {
            Ok(())
        }
    }
}

pub fn post_service(store: &Arc<InMemoryStore>) -> PostService {
    PostService::new(store.clone(), store.clone())
}

pub fn category_service(store: &Arc<InMemoryStore>) -> CategoryService {
    CategoryService::new(store.clone(), store.clone())
}

pub fn rpc_state(store: &Arc<InMemoryStore>) -> RpcState {
    RpcState {
        posts: Arc::new(post_service(store)),
        categories: Arc::new(category_service(store)),
        health: store.clone(),
    }
}

pub async fn seed_category(store: &Arc<InMemoryStore>, name: &str, slug: &str) -> CategoryRecord {
    category_service(store)
        .add_category(CreateCategoryCommand {
            name: name.to_string(),
            slug: slug.to_string(),
        })
        .await
        .expect("seed category")
}
