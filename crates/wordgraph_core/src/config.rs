//! Immutable engine configuration.
//!
//! # Responsibility
//! - Hold tunables passed explicitly at engine construction.
//!
//! # Invariants
//! - A validated config has positive limits and a non-empty default graph type.
//! - Missing fields in serialized input fall back to [`EngineConfig::default`].

use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Engine tunables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Result cap used by word search when the caller gives none.
    pub search_default_limit: i64,
    /// Hard upper bound on any search limit.
    pub search_max_limit: i64,
    /// Neighbor expansion depth is clamped to this value.
    pub max_neighbor_depth: u32,
    /// Type tag for graphs created without one.
    pub default_graph_type: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            search_default_limit: 10,
            search_max_limit: 100,
            max_neighbor_depth: 6,
            default_graph_type: "3d".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search_default_limit <= 0 {
            return Err(ConfigError::NonPositive("search_default_limit"));
        }
        if self.search_max_limit < self.search_default_limit {
            return Err(ConfigError::MaxBelowDefault {
                default_limit: self.search_default_limit,
                max_limit: self.search_max_limit,
            });
        }
        if self.max_neighbor_depth == 0 {
            return Err(ConfigError::NonPositive("max_neighbor_depth"));
        }
        if self.default_graph_type.trim().is_empty() {
            return Err(ConfigError::EmptyDefaultGraphType);
        }
        Ok(())
    }

    /// Resolves a caller-supplied search limit against defaults and caps.
    ///
    /// Non-positive values pass through so the index can return nothing.
    pub fn effective_search_limit(&self, requested: Option<i64>) -> i64 {
        match requested {
            None => self.search_default_limit,
            Some(value) => value.min(self.search_max_limit),
        }
    }
}

/// Configuration rejected by [`EngineConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    NonPositive(&'static str),
    MaxBelowDefault { default_limit: i64, max_limit: i64 },
    EmptyDefaultGraphType,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositive(field) => write!(f, "`{field}` must be positive"),
            Self::MaxBelowDefault {
                default_limit,
                max_limit,
            } => write!(
                f,
                "search_max_limit {max_limit} is below search_default_limit {default_limit}"
            ),
            Self::EmptyDefaultGraphType => write!(f, "default_graph_type must not be empty"),
        }
    }
}

impl Error for ConfigError {}
