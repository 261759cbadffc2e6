//! In-memory content store - used when no database is configured.

mod store;

pub use store::{
    InMemoryCommentRepository, InMemoryContentStore, InMemoryPostRepository,
    InMemoryTagRepository,
};
