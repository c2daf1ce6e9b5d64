//! Service-level error taxonomy.
//!
//! # Invariants
//! - Raw store/index failures only leave services wrapped in `Internal`.
//! - `code()` values are stable and safe to hand to a delivery layer.

use crate::auth::AccessDenied;
use crate::context::Interrupt;
use crate::model::validation::ValidationError;
use crate::query::QueryError;
use crate::repo::RepoError;
use crate::search::fts::SearchError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failure wrapped as [`ServiceError::Internal`].
#[derive(Debug)]
pub enum InternalCause {
    Repo(RepoError),
    Search(SearchError),
    Query(QueryError),
}

impl Display for InternalCause {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Search(err) => write!(f, "{err}"),
            Self::Query(err) => write!(f, "{err}"),
        }
    }
}

impl Error for InternalCause {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Search(err) => Some(err),
            Self::Query(err) => Some(err),
        }
    }
}

/// Error returned by every engine operation.
#[derive(Debug)]
pub enum ServiceError {
    /// Entity absent, or hidden from the caller by policy.
    NotFound(String),
    /// Malformed or contradictory arguments.
    BadInput(String),
    /// Ownership check failed on an existing resource.
    Unauthorized(AccessDenied),
    Internal(InternalCause),
    Cancelled,
    DeadlineExceeded,
}

impl ServiceError {
    /// Stable snake_case code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::BadInput(_) => "bad_input",
            Self::Unauthorized(_) => "unauthorized",
            Self::Internal(_) => "internal",
            Self::Cancelled => "cancelled",
            Self::DeadlineExceeded => "deadline_exceeded",
        }
    }

    pub(crate) fn not_found(what: impl Display) -> Self {
        Self::NotFound(what.to_string())
    }

    pub(crate) fn bad_input(what: impl Display) -> Self {
        Self::BadInput(what.to_string())
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(what) => write!(f, "not found: {what}"),
            Self::BadInput(what) => write!(f, "bad input: {what}"),
            Self::Unauthorized(err) => write!(f, "unauthorized: {err}"),
            Self::Internal(err) => write!(f, "internal error: {err}"),
            Self::Cancelled => write!(f, "operation cancelled"),
            Self::DeadlineExceeded => write!(f, "operation deadline exceeded"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Unauthorized(err) => Some(err),
            Self::Internal(err) => Some(err),
            Self::NotFound(_) | Self::BadInput(_) | Self::Cancelled | Self::DeadlineExceeded => {
                None
            }
        }
    }
}

impl From<Interrupt> for ServiceError {
    fn from(value: Interrupt) -> Self {
        match value {
            Interrupt::Cancelled => Self::Cancelled,
            Interrupt::DeadlineExceeded => Self::DeadlineExceeded,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::bad_input(value)
    }
}

impl From<AccessDenied> for ServiceError {
    fn from(value: AccessDenied) -> Self {
        Self::Unauthorized(value)
    }
}

/// Default mapping; services override it where an entity policy differs.
impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::bad_input(err),
            RepoError::SelfLoop(_) => Self::bad_input(value),
            RepoError::WordNotFound(_)
            | RepoError::GraphNotFound(_)
            | RepoError::LinkNotFound(_) => Self::not_found(value),
            other => Self::Internal(InternalCause::Repo(other)),
        }
    }
}

impl From<SearchError> for ServiceError {
    fn from(value: SearchError) -> Self {
        match value {
            SearchError::InvalidQuery { .. } => Self::bad_input(value),
            other => Self::Internal(InternalCause::Search(other)),
        }
    }
}

impl From<QueryError> for ServiceError {
    fn from(value: QueryError) -> Self {
        match value {
            QueryError::Interrupted(reason) => reason.into(),
            other => Self::Internal(InternalCause::Query(other)),
        }
    }
}
