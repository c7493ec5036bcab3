//! Database layer for data persistence and access.
//!
//! This module implements the data access layer using SQLx with PostgreSQL,
//! following the repository pattern: each entity has a repository in
//! [`handlers`] that encapsulates its queries, returning record structs from
//! [`models`]. Errors are categorized in [`errors`].
//!
//! Repositories wrap a `&mut PgConnection`; multi-statement operations open a
//! transaction on it (a savepoint when the connection is already inside one),
//! so composing repositories inside an outer transaction keeps the whole
//! sequence atomic. The workflows that pair a wallet debit with a record
//! insert rely on exactly that.
//!
//! Migrations live in `migrations/` and are run by [`crate::migrator`].

pub mod errors;
pub mod handlers;
pub mod models;
