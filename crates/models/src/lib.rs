//! User data shapes and the conversions between them.
//!
//! - [`user::UserRecord`]: storage-shaped row
//! - [`user::User`]: canonical domain value
//! - [`user::UserResponse`] / [`user::UserClaims`]: outward projections
//! - [`mapper`]: pure functions moving data between the above

pub mod errors;
pub mod mapper;
pub mod user;

pub use errors::ModelError;
pub use user::{NewUser, User, UserClaims, UserPatch, UserRecord, UserResponse};
