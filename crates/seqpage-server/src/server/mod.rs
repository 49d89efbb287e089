//! HTTP surface of the page-creation service.
//!
//! ## Structure
//!
//! - [`config`] - CLI/environment configuration and the database registry.
//! - [`state`] - Shared request state (store, registry, limits).
//! - [`handler`] - `GET /create-page` and `GET /health`.
//! - [`error`] - Request-level errors and their status codes.
//! - [`routes`] - Router assembly.
//! - [`telemetry`] - Log subscriber setup.

pub mod config;
pub mod error;
pub mod handler;
pub mod routes;
pub mod state;
pub mod telemetry;
