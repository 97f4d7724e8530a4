//! Port contracts for the organization module.
//!
//! Ports define infrastructure-agnostic interfaces used by org services.

pub mod directory;

pub use directory::{UserDirectory, UserDirectoryError, UserDirectoryResult};
