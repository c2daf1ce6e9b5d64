//! Domain model for collaborative word graphs.
//!
//! # Responsibility
//! - Define the canonical records stored and returned by the engine.
//! - Own input validation limits for caller-supplied fields.
//!
//! # Invariants
//! - Every stored entity is identified by an engine-generated UUID.
//! - Graphs are soft-deleted; Words and Links are hard-deleted.

pub mod edge;
pub mod graph;
pub mod link;
pub mod profile;
pub mod validation;
pub mod word;
