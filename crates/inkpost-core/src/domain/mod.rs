//! Domain entities - the core business objects.

mod post;
mod user;

pub use post::{AuthorSummary, NewPost, Post, PostChanges, PostStatus, PostView};
pub use user::User;

/// Store-level field constraints, checked on every insert and update.
///
/// Returns every violated constraint message, not just the first.
pub trait Validate {
    fn validate(&self) -> Result<(), Vec<String>>;
}
