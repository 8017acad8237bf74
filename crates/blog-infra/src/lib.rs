//! # Blogicum Infrastructure
//!
//! Concrete implementations of the ports defined in `blog-core`: the Entity
//! Store (PostgreSQL through SeaORM, or in memory) and authentication.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL Entity Store via SeaORM
//! - `auth` - JWT + Argon2 authentication

pub mod database;

#[cfg(feature = "auth")]
pub mod auth;

// Re-exports - In-Memory
pub use database::{DatabaseConfig, DatabaseConnections, InMemoryEntityStore};

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
