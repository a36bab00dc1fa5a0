//! Bearer-token authentication and role guards.
//!
//! [`optional_jwt_auth_middleware`] decodes a token when one is present and
//! stores the [`JwtClaims`] in request extensions. Handlers that need a role
//! take a [`RequireRole`] argument, which rejects with 401 when no claims were
//! attached and 403 when the role is missing.
//!
//! ```ignore
//! use axum_helpers::auth::{Admin, JwtAuth, JwtConfig, RequireRole, optional_jwt_auth_middleware};
//!
//! async fn remove(RequireRole(claims, ..): RequireRole<Admin>) -> String {
//!     claims.sub
//! }
//!
//! let auth = JwtAuth::new(&JwtConfig::from_env()?);
//! let app = Router::new()
//!     .route("/items", delete(remove))
//!     .layer(axum::middleware::from_fn_with_state(auth, optional_jwt_auth_middleware));
//! ```

pub mod config;
pub mod jwt;
pub mod middleware;
pub mod role;

pub use config::JwtConfig;
pub use jwt::{ACCESS_TOKEN_TTL, JwtAuth, JwtClaims};
pub use middleware::optional_jwt_auth_middleware;
pub use role::{Admin, RequireRole, Role};
