//! Token validation primitives. Tokens are issued by an external identity
//! service; this crate only verifies them.

pub mod jwt;

/// Role allowed to remove stored images.
pub const ROLE_ADMIN: &str = "admin";
