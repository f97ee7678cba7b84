//! In-memory people service.
//!
//! A small HTTP service exposing CRUD operations over a list of person
//! records, with optional liveness and readiness probes.
//!
//! # Endpoints
//!
//! ```text
//! GET    /people        list every record
//! GET    /people/:id    one record, or {} when missing
//! POST   /people/:id    append a record, returns the updated list
//! DELETE /people/:id    remove a record, returns the updated list
//! GET    /live          liveness probe
//! GET    /ready         readiness probe
//! GET    /metrics       Prometheus exposition
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`people`]: Person records and the in-memory store
//! - [`health`]: Liveness and readiness checks
//! - [`api`]: HTTP handlers and router
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod health;
pub mod metrics;
pub mod people;
pub mod utils;

pub use config::Config;
pub use error::{Result, ServiceError};
