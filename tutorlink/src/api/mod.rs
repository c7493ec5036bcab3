//! HTTP API layer.
//!
//! - [`handlers`]: axum request handlers, one module per workflow
//! - [`models`]: request/response data structures (the public API contract),
//!   kept separate from the database models

pub mod handlers;
pub mod models;
