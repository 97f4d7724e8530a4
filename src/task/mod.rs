//! Task lifecycle management for Foreman.
//!
//! This module implements the guarded six-state task lifecycle and the
//! policies deciding who may view, assign, or mutate a task: recursive
//! hierarchy-aware access decisions, assignment permission, the gated
//! update pipeline, dedicated approve/reject operations, and the
//! append-only decision audit written atomically with the state change.
//! The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
