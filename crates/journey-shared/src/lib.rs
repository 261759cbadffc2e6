//! # Journey Shared
//!
//! Wire types of the blog HTTP API, kept free of domain and server crates.

pub mod dto;
pub mod response;

pub use response::{ErrorResponse, FormErrorResponse};
