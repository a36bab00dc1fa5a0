//! Products API routes

use axum::{middleware, Router};
use axum_helpers::optional_jwt_auth_middleware;
use domain_products::{handlers, PgProductRepository};

use crate::state::AppState;

/// Products router; bearer tokens are verified here so the write handlers
/// can check for the Admin role.
pub fn router(state: &AppState) -> Router {
    let repository = PgProductRepository::new(state.db.clone());

    handlers::router(repository).layer(middleware::from_fn_with_state(
        state.jwt.clone(),
        optional_jwt_auth_middleware,
    ))
}
