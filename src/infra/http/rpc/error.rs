use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::categories::CategoryServiceError;
use crate::application::error::ErrorReport;
use crate::application::posts::PostServiceError;
use crate::application::repos::RepoError;

pub mod codes {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    pub const CONFLICT: &str = "CONFLICT";
    pub const INTERNAL: &str = "INTERNAL";
}

const SOURCE: &str = "infra::http::rpc";

#[derive(Debug, Serialize)]
pub struct RpcErrorBody {
    pub error: RpcErrorMessage,
}

#[derive(Debug, Serialize)]
pub struct RpcErrorMessage {
    pub code: &'static str,
    pub message: String,
}

/// Which record a storage failure concerns; drives the wording of the
/// user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Post,
    Category,
}

impl Entity {
    fn title(self) -> &'static str {
        match self {
            Entity::Post => "Post",
            Entity::Category => "Category",
        }
    }

    fn lower(self) -> &'static str {
        match self {
            Entity::Post => "post",
            Entity::Category => "category",
        }
    }
}

#[derive(Debug)]
pub struct RpcError {
    status: StatusCode,
    code: &'static str,
    message: String,
    detail: Option<String>,
}

impl RpcError {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            detail: None,
        }
    }

    /// Internal diagnostic recorded in the response log but never sent to the
    /// caller.
    fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, codes::BAD_REQUEST, message)
    }

    /// Malformed body or a field of the wrong type.
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::bad_request(format!("Invalid input: {}", reason.into()))
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, codes::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, codes::CONFLICT, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::INTERNAL,
            message,
        )
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Classify a storage failure for `entity`.
    pub fn from_repo(entity: Entity, err: RepoError) -> Self {
        let detail = err.to_string();
        let error = match err {
            RepoError::NotFound => Self::not_found(format!("{} not found.", entity.title())),
            RepoError::Duplicate { .. } => {
                Self::conflict(format!("{} already exists.", entity.title()))
            }
            RepoError::InvalidInput { .. } => {
                Self::bad_request(format!("Invalid related {}.", entity.lower()))
            }
            RepoError::UnknownCategories { .. } => Self::bad_request("Invalid related category."),
            RepoError::Integrity { .. } => {
                Self::bad_request(format!("{} failed a database constraint.", entity.title()))
            }
            RepoError::Timeout | RepoError::Persistence(_) => {
                Self::internal("Database error occurred.")
            }
        };
        error.with_detail(detail)
    }
}

impl From<PostServiceError> for RpcError {
    fn from(err: PostServiceError) -> Self {
        match err {
            PostServiceError::Validation(err) => Self::bad_request(err.to_string()),
            PostServiceError::Pagination(err) => Self::bad_request(err.to_string()),
            PostServiceError::NotFound(id) => {
                Self::not_found("Post not found.").with_detail(format!("post `{id}` not found"))
            }
            PostServiceError::Repo(err) => Self::from_repo(Entity::Post, err),
        }
    }
}

impl From<CategoryServiceError> for RpcError {
    fn from(err: CategoryServiceError) -> Self {
        match err {
            CategoryServiceError::Validation(err) => Self::bad_request(err.to_string()),
            CategoryServiceError::NotFound(id) => Self::not_found("Category not found.")
                .with_detail(format!("category `{id}` not found")),
            CategoryServiceError::Repo(err) => Self::from_repo(Entity::Category, err),
        }
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let detail = self.detail.unwrap_or_else(|| self.message.clone());
        let body = RpcErrorBody {
            error: RpcErrorMessage {
                code: self.code,
                message: self.message,
            },
        };
        let mut response = (self.status, Json(body)).into_response();
        ErrorReport::from_message(SOURCE, self.status, format!("{}: {detail}", self.code))
            .attach(&mut response);
        response
    }
}
