use std::sync::Arc;

use crate::application::categories::CategoryService;
use crate::application::posts::PostService;
use crate::application::repos::HealthRepo;

#[derive(Clone)]
pub struct RpcState {
    pub posts: Arc<PostService>,
    pub categories: Arc<CategoryService>,
    pub health: Arc<dyn HealthRepo>,
}
