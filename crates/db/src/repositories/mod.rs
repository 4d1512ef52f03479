//! Repositories for database operations.

pub mod comment;
pub mod like;
pub mod media_item;
pub mod rating;
pub mod tag;
pub mod user;
pub mod user_level;

pub use comment::CommentRepository;
pub use like::LikeRepository;
pub use media_item::{MediaItemRepository, NewMediaItem};
pub use rating::RatingRepository;
pub use tag::TagRepository;
pub use user::{NewUser, UserRepository};
pub use user_level::UserLevelRepository;
