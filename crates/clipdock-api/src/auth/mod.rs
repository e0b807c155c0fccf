//! JWT bearer authentication.
//!
//! Tokens are HS256-signed with the shared secret from configuration.
//! Issuance lives in whatever identity service fronts this API; this
//! module only validates.

pub mod middleware;
pub mod models;

pub use middleware::{auth_middleware, AuthState};
pub use models::AuthContext;
