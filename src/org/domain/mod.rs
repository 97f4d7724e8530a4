//! Domain model for the organization hierarchy.
//!
//! The org domain models users, the closed role set, and the invariants of
//! the manager/report graph while keeping all infrastructure concerns
//! outside of the domain boundary.

mod error;
mod ids;
mod user;

pub use error::{OrgDomainError, ParseRoleError};
pub use ids::UserId;
pub use user::{Actor, PersistedUserData, Role, User};
