//! # Journey Infrastructure
//!
//! Concrete implementations of the ports defined in `journey-core`.
//! This crate contains the content stores and mail delivery adapters.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL content store via SeaORM
//! - `webhook-mail` - Mail delivery through an HTTP mail API

pub mod database;
pub mod mail;
pub mod memory;

// Re-exports
pub use database::{DatabaseConfig, DatabaseConnections};
pub use mail::ConsoleMailer;
pub use memory::InMemoryContentStore;

#[cfg(feature = "postgres")]
pub use database::{PostgresCommentRepository, PostgresPostRepository, PostgresTagRepository};

#[cfg(feature = "webhook-mail")]
pub use mail::{WebhookMailer, WebhookMailerConfig};
