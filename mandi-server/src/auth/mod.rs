//! Authentication module
//!
//! JWT + Argon2 authentication: token service, axum extractor, and the
//! auth/role middleware.

pub mod extractor;
pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_auth, require_role};
