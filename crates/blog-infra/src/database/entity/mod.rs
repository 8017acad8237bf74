//! SeaORM entities. Referential actions mirror the migration's foreign keys.

pub mod category;
pub mod comment;
pub mod location;
pub mod post;
pub mod user;
