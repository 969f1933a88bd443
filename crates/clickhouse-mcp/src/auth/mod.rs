//! Bearer-token authentication
//!
//! Validates HS256-signed JWTs presented on the streaming tool route. The
//! algorithm is pinned at construction; tokens carrying any other algorithm
//! fail validation regardless of what their header claims.

mod claims;
mod error;
mod jwt;
mod middleware;

pub use claims::Claims;
pub use error::AuthError;
pub use jwt::JwtValidator;
pub use middleware::{AuthState, access_gate};
