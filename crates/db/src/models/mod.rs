//! Row structs for the catalog tables.
//!
//! Each submodule holds a `FromRow` struct matching the table row and a
//! conversion into the corresponding `recipebox_core` type. Input DTOs live
//! in `recipebox_core` next to their validation rules.

pub mod image;
pub mod rating;
pub mod recipe;
pub mod user;
