//! HTTP request handlers, one module per workflow.

pub mod applications;
pub mod contacts;
pub mod payments;
pub mod posts;
pub mod resources;
pub mod teachers;
pub mod users;
pub mod wallet;
