pub mod images;
pub mod ratings;
pub mod recipes;
