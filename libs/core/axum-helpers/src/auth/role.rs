//! Role guard extractor.

use super::jwt::JwtClaims;
use crate::errors::AppError;
use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

/// A role name checked against [`JwtClaims::roles`].
pub trait Role: Send + Sync + 'static {
    const NAME: &'static str;
}

/// Catalog administrators; the only role allowed to change products.
#[derive(Debug, Clone, Copy)]
pub struct Admin;

impl Role for Admin {
    const NAME: &'static str = "Admin";
}

/// Resolves to the caller's claims only when they carry role `R`.
///
/// Claims come from request extensions, attached by
/// [`optional_jwt_auth_middleware`](super::optional_jwt_auth_middleware).
/// No claims rejects with 401, claims without the role with 403.
#[derive(Debug, Clone)]
pub struct RequireRole<R: Role>(pub JwtClaims, pub PhantomData<R>);

impl<R: Role> RequireRole<R> {
    pub fn claims(&self) -> &JwtClaims {
        &self.0
    }
}

impl<S, R> FromRequestParts<S> for RequireRole<R>
where
    S: Send + Sync,
    R: Role,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = parts
            .extensions
            .get::<JwtClaims>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        if !claims.has_role(R::NAME) {
            tracing::info!(sub = %claims.sub, role = R::NAME, "Caller lacks required role");
            return Err(AppError::Forbidden(format!("{} role required", R::NAME)));
        }

        Ok(RequireRole(claims, PhantomData))
    }
}
