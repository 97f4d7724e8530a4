//! Organization model for Foreman.
//!
//! This module owns users, the closed role set, and resolution of the
//! manager/report hierarchy: computing the transitive closure of a
//! manager's reports and administering role and manager assignments. The
//! module follows hexagonal architecture:
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
