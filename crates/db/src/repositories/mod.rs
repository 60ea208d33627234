//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod image_repo;
pub mod rating_repo;
pub mod recipe_repo;
pub mod user_repo;

pub use image_repo::ImageRepo;
pub use rating_repo::RatingRepo;
pub use recipe_repo::RecipeRepo;
pub use user_repo::UserRepo;
