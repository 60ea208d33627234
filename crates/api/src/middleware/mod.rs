//! Identity extractors.
//!
//! - [`auth::AuthUser`] extracts the caller from a Bearer JWT.
//! - [`rbac::RequireAdmin`] additionally requires the `admin` role.

pub mod auth;
pub mod rbac;
