//! Precious Coffer API server library.
//!
//! Exposes the building blocks (config, state, error handling, media
//! storage, routes) so integration tests and the binary entrypoint can both
//! access them.

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod hooks;
pub mod media;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;
