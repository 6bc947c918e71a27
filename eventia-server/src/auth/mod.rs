//! Authentication and authorization
//!
//! - [`password`]: argon2 credential hashing and verification
//! - [`resolver`]: user → role names and permission keys
//! - [`JwtService`]: token issue and validation
//! - [`require_auth`]: global authentication middleware
//! - [`require_permission`]: per-route permission gate
//! - [`permissions`]: the built-in permission keys

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod permissions;
pub mod resolver;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_auth, require_permission};
pub use resolver::{ResolvedAccess, resolve};
