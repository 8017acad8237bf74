//! # Blogicum Core
//!
//! The domain layer of the Blogicum blog backend.
//! This crate contains the entities, the visibility and ownership rules, and the
//! services that shape post and comment collections. It has no infrastructure
//! dependencies: persistence and authentication are reached through [`ports`].

pub mod domain;
pub mod error;
pub mod pagination;
pub mod ports;
pub mod services;

pub use error::{DomainError, RepoError};
pub use pagination::{PAGE_SIZE, Page, PageRequest};
