//! Domain core for the recipe catalog.
//!
//! Holds the domain types, validation rules, listing order policies,
//! rating aggregation and the image transform. Persistence is reached only
//! through the traits in [`store`], so everything here runs without a
//! database (see [`memory::MemoryStore`]).

pub mod aggregator;
pub mod catalog;
pub mod error;
pub mod imaging;
pub mod library;
pub mod memory;
pub mod ordering;
pub mod pagination;
pub mod rating;
pub mod recipe;
pub mod store;
pub mod types;
pub mod user;
pub mod validation;
