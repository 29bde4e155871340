//! Database repositories for the data access layer
//!
//! Each repository owns one entity (users, documents, applications) and
//! provides CRUD operations and the specialized queries the handlers need.
//! Rows are fetched into plain row structs and converted to domain models,
//! so enum parsing failures surface as `AppError` rather than panics.

pub mod db;

pub use db::applications::ApplicationRepository;
pub use db::documents::DocumentRepository;
pub use db::users::UserRepository;
