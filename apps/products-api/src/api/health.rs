//! Readiness endpoint

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use axum_helpers::{run_health_checks, HealthCheckFuture};
use sea_orm::DatabaseConnection;
use serde_json::Value;

/// 200 once PostgreSQL answers `SELECT 1`, 503 otherwise.
async fn ready(State(db): State<DatabaseConnection>) -> (StatusCode, Json<Value>) {
    let postgres: HealthCheckFuture<'_> = Box::pin(async {
        database::postgres::check_health(&db)
            .await
            .map_err(|e| e.to_string())
    });

    run_health_checks(vec![("postgres", postgres)]).await
}

pub fn router(db: DatabaseConnection) -> Router {
    Router::new().route("/ready", get(ready)).with_state(db)
}
