//! Service layer providing user CRUD on top of the `models` crate.
//! - `repository`: storage contract and the in-memory store
//! - `user_service`: business rules (validation, unique email)
//! - `auth`: signed credentials from user claims
//! - `storage`: optional JSON persistence for the in-memory store

pub mod errors;
pub mod auth;
pub mod pagination;
pub mod repository;
pub mod storage;
pub mod user_service;
#[cfg(test)]
pub mod test_support;

pub use errors::ServiceError;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use user_service::UserService;
