//! Application services and the repository seams they depend on.

pub mod categories;
pub mod error;
pub mod pagination;
pub mod posts;
pub mod repos;
