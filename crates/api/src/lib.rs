//! Recipebox HTTP API library.
//!
//! Exposes config, state, error mapping and the router builder so the
//! binary entrypoint and the integration tests assemble the same app.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
