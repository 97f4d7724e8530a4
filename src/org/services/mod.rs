//! Application services for the organization module.

mod hierarchy;
mod roster;

pub use hierarchy::{HierarchyError, HierarchyResolver, SubordinateCache};
pub use roster::{RosterError, RosterService, UserUpdate};
