mod commands;
mod queries;
mod service;
pub mod types;

pub use service::PostService;
pub use types::{
    CreatePostCommand, ListPostsQuery, PostListing, PostServiceError, UpdatePostCommand,
};
