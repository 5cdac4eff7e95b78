//! Deep Guard API server library.
//!
//! Exposes the building blocks (config, state, error handling, session
//! provider, upload workflow, assistant relay, routes) so integration tests
//! and the binary entrypoint can both access them.

pub mod analysis;
pub mod assistant;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod session;
pub mod state;
