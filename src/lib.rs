//! To-do list CRUD API backed by PostgreSQL.
//!
//! This library implements a small HTTP service for managing to-do items:
//! list, get, create, set-completion and delete operations exposed over an
//! axum router and persisted through a sqlx connection pool. A tiny auxiliary
//! proxy forwards one upstream deployment-status call.
//!
//! # Request flow
//!
//! ```text
//! HTTP request → router → handler → ItemStore → PostgreSQL
//!                                 ← rows / NotFound
//!             ← status + JSON envelope
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`store`]: Item persistence (PostgreSQL + in-memory)
//! - [`api`]: HTTP routes and handlers
//! - [`proxy`]: Upstream status reverse proxy
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod proxy;
pub mod store;
pub mod utils;

pub use config::Config;
pub use error::{AppError, Result};
