//! Core domain engine for collaborative word graphs.
//! This crate is the single source of truth for graph invariants.

pub mod auth;
pub mod config;
pub mod context;
pub mod db;
pub mod engine;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod search;
pub mod service;

pub use auth::{authorize, is_allowed, AccessDenied};
pub use config::{ConfigError, EngineConfig};
pub use context::{CallContext, CancelToken, Interrupt};
pub use engine::{Engine, EngineError, StoreStats};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::edge::{AdjacencyEdge, EdgeId, Subgraph};
pub use model::graph::{Graph, GraphId, GraphPatch, NewGraph};
pub use model::link::{Link, LinkFields, LinkId};
pub use model::profile::{parse_role, Profile, Role, RoleParseError, UserId};
pub use model::validation::ValidationError;
pub use model::word::{Word, WordFields, WordId};
pub use repo::link_repo::LinkUpsert;
pub use repo::{RepoError, RepoResult};
pub use search::fts::{SearchError, SearchHit, SearchQuery, SearchResult, TextIndex};
pub use service::{InternalCause, ServiceError, ServiceResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
