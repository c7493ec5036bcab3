//! Repository implementations for database access.
//!
//! Each repository wraps a SQLx connection, provides strongly-typed
//! operations for one entity, and returns record structs from
//! [`crate::db::models`].
//!
//! # Available Repositories
//!
//! - [`Users`]: account lookup and provisioning
//! - [`TeacherProfiles`]: tutor profiles and approval state
//! - [`Posts`]: student post requirements
//! - [`Wallets`]: the coin ledger (sole balance arbiter)
//! - [`Contacts`]: paid contact unlocks
//! - [`Applications`]: paid tutor applications
//! - [`Payments`]: external payment attempts
//! - [`SubjectResources`]: nested learning-resource documents

pub mod applications;
pub mod contacts;
pub mod payments;
pub mod posts;
pub mod resources;
pub mod teachers;
pub mod users;
pub mod wallets;

pub use applications::Applications;
pub use contacts::Contacts;
pub use payments::Payments;
pub use posts::Posts;
pub use resources::SubjectResources;
pub use teachers::TeacherProfiles;
pub use users::Users;
pub use wallets::{WalletError, Wallets};
