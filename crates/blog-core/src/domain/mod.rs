//! Domain entities - the core business objects.

mod category;
mod comment;
mod location;
mod post;
pub(crate) mod user;

pub use category::Category;
pub use comment::{Comment, CommentDetails, CommentDraft};
pub use location::Location;
pub use post::{Post, PostDetails, PostDraft};
pub use user::{Actor, Author, ProfileChanges, User};

/// Maximum length of titles and names.
pub const MAX_TITLE_LEN: usize = 256;

/// Maximum length of a username.
pub const MAX_USERNAME_LEN: usize = 150;
