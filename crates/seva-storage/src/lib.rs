//! Seva Storage Library
//!
//! Storage abstraction and backends for uploaded document files.
//!
//! # Storage key format
//!
//! Keys are user-scoped: `documents/{user_id}/{document-type-slug}-{uuid}.{ext}`.
//! Keys must not contain `..`, empty segments, or a leading `/`. Key
//! generation is centralized in the `keys` module so all backends stay
//! consistent.

pub mod keys;
pub mod local;
pub mod traits;

// Re-export commonly used types
pub use keys::document_key;
pub use local::LocalStorage;
pub use traits::{Storage, StorageError, StorageResult};
