//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository, query and index calls into use-case level APIs.
//! - Resolve existence and ownership before any mutation.
//! - Keep delivery layers decoupled from storage details.
//!
//! # Invariants
//! - Every operation checks the caller context before touching the store.
//! - Every mutation emits one outcome event; `Internal` failures log at `error`.

use log::{error, log, warn, Level};

pub mod error;
pub mod explore_service;
pub mod graph_service;
pub mod link_service;
pub mod word_service;

pub use error::{InternalCause, ServiceError, ServiceResult};

/// Runs one operation, logs its outcome and passes the result through.
pub(crate) fn observe<T>(
    event: &'static str,
    ok_level: Level,
    operation: impl FnOnce() -> ServiceResult<T>,
) -> ServiceResult<T> {
    let result = operation();
    match &result {
        Ok(_) => log!(ok_level, "event={event} module=service status=ok"),
        Err(err @ ServiceError::Internal(_)) => error!(
            "event={event} module=service status=error error_code={} error={err}",
            err.code()
        ),
        Err(err) => warn!(
            "event={event} module=service status=rejected error_code={}",
            err.code()
        ),
    }
    result
}
