//! `PostgreSQL` adapters for the organization module.

mod models;
mod repository;
mod schema;

pub use repository::{OrgPgPool, PostgresUserDirectory};
