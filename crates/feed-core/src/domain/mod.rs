//! Domain entities - the core business objects.

mod image;
mod post;
mod user;

pub use image::ImageKind;
pub use post::{Post, PostDraft, PostPage};
pub use user::{DEFAULT_STATUS, NewUser, User};
