//! # Journey Core
//!
//! The domain layer of the Journey blog.
//! Entities, ports, ranking rules and the blog service live here; this crate
//! has no infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod forms;
pub mod pagination;
pub mod ports;
pub mod query;
pub mod ranking;
pub mod search;
pub mod service;

pub use error::DomainError;
pub use service::{BlogService, BlogSettings};
