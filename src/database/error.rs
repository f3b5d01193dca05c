use std::fmt::{self, Display};

use serde::Serialize;
use thiserror::Error;
use warp::http::StatusCode;
use warp::reject::Reject;

use super::validate::ValidationReport;

#[derive(Debug, Error)]
#[error("{info}")]
pub struct QueryError {
    info: String,
}

impl QueryError {
    pub fn new(info: String) -> Self {
        Self { info }
    }
}

impl From<sqlx::Error> for QueryError {
    fn from(value: sqlx::Error) -> Self {
        match value {
            sqlx::Error::Configuration(e) => Self::new(format!("{e}")),
            sqlx::Error::Database(e) => Self::new(format!("{e}")),
            sqlx::Error::Io(e) => Self::new(format!("{e}")),
            sqlx::Error::Tls(e) => Self::new(format!("{e}")),
            sqlx::Error::Protocol(e) => Self::new(format!("{e}")),
            sqlx::Error::RowNotFound => Self::new(String::from("RowNotFound")),
            sqlx::Error::TypeNotFound { type_name } => {
                Self::new(format!("Type not found: {type_name}"))
            }
            sqlx::Error::ColumnIndexOutOfBounds { index, len } => {
                Self::new(format!("Column index out of bounds {index} ({len})"))
            }
            sqlx::Error::ColumnNotFound(e) => Self::new(format!("{e}")),
            sqlx::Error::ColumnDecode { index, source } => {
                Self::new(format!("Column decode {index} ({source})"))
            }
            sqlx::Error::Decode(e) => Self::new(format!("{e}")),
            sqlx::Error::AnyDriverError(e) => Self::new(format!("{e}")),
            sqlx::Error::PoolTimedOut => Self::new(String::from("Pool timed out")),
            sqlx::Error::PoolClosed => Self::new(String::from("Pool closed")),
            sqlx::Error::WorkerCrashed => Self::new(String::from("Worker crashed")),
            sqlx::Error::Migrate(e) => Self::new(format!("{e}")),
            _ => Self::new(String::from("Unknown error")),
        }
    }
}

/// Duplicate-toggle and uniqueness conflicts. Recoverable: the caller can
/// correct and resubmit, no partial state is left behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Conflict {
    AlreadyFavorited,
    NotFavorited,
    AlreadyInCart,
    NotInCart,
    AlreadyFollowing,
    NotFollowing,
    UserExists,
    TagExists,
}

impl Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let info = match self {
            Conflict::AlreadyFavorited => "Recipe is already in favorites",
            Conflict::NotFavorited => "Recipe is not in favorites",
            Conflict::AlreadyInCart => "Recipe is already in the shopping cart",
            Conflict::NotInCart => "Recipe is not in the shopping cart",
            Conflict::AlreadyFollowing => "You are already following this author",
            Conflict::NotFollowing => "You are not following this author",
            Conflict::UserExists => "Username or email is already registered",
            Conflict::TagExists => "Tag with the same name, slug or color exists",
        };
        write!(f, "{info}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// No session where one is required.
    Unauthorized,
    /// Session role does not allow the action.
    Forbidden,
    /// Only the recipe's author may update or delete it.
    NotOwner,
    /// (user, author) follow with user == author.
    SelfFollowForbidden,
}

impl Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let info = match self {
            Permission::Unauthorized => "Authentication required",
            Permission::Forbidden => "You don't have permission to perform this action",
            Permission::NotOwner => "Only the author may modify this recipe",
            Permission::SelfFollowForbidden => "You cannot follow yourself",
        };
        write!(f, "{info}")
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed")]
    Validation(ValidationReport),
    #[error("{0}")]
    Conflict(Conflict),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Permission(Permission),
    #[error("{0}")]
    BadRequest(String),
    #[error("media store failed: {0}")]
    Media(String),
    #[error("{0}")]
    Internal(String),
    #[error("query failed: {0}")]
    Query(#[from] QueryError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Permission(Permission::Unauthorized) => StatusCode::UNAUTHORIZED,
            ApiError::Permission(Permission::SelfFollowForbidden) => StatusCode::BAD_REQUEST,
            ApiError::Permission(_) => StatusCode::FORBIDDEN,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Media(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Query(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(value: sqlx::Error) -> Self {
        ApiError::Query(QueryError::from(value))
    }
}

impl From<ValidationReport> for ApiError {
    fn from(value: ValidationReport) -> Self {
        ApiError::Validation(value)
    }
}

impl Reject for ApiError {}

/// Malformed payload values (unparsable enums, broken base64, missing keys).
#[derive(Debug)]
pub struct TypeError {
    info: String,
}

impl TypeError {
    pub fn new(info: &str) -> Self {
        Self {
            info: info.to_string(),
        }
    }
}

impl Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.info)
    }
}

impl std::error::Error for TypeError {}

impl From<TypeError> for ApiError {
    fn from(value: TypeError) -> Self {
        ApiError::BadRequest(value.info)
    }
}
