//! Error types for organization domain validation and parsing.

use super::UserId;
use thiserror::Error;

/// Errors returned while constructing or mutating org domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OrgDomainError {
    /// A user referenced itself as its own manager.
    #[error("user {0} cannot be their own manager")]
    SelfManagement(UserId),
}

/// Error returned while parsing role literals from the boundary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);
