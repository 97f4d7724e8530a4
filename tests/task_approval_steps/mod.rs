//! Step definitions for task approval behaviour scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
