//! Core services - the rules deciding what a viewer sees and what an actor may change.
//!
//! Every service is stateless apart from its repository handles; each call works
//! against the Entity Store snapshot it reads.

pub mod authorization;
mod comments;
mod post_query;
mod posts;
mod profiles;
pub mod visibility;

pub use authorization::{Outcome, Owned};
pub use comments::CommentService;
pub use post_query::PostQueryService;
pub use posts::PostService;
pub use profiles::ProfileService;
