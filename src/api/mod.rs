pub mod customer;
pub mod public;
pub mod tailor;

use axum::{middleware::from_fn, Router};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::middleware::logging::logging_middleware;
use customer::customer_api_router;
use public::public_api_router;
use tailor::tailor_api_router;

pub fn create_api_router(shared_db: Arc<DatabaseConnection>, config: Arc<AppConfig>) -> Router {
    Router::new()
        .merge(public_api_router(shared_db.clone(), config.clone()))
        .nest(
            "/api/customer",
            customer_api_router(shared_db.clone(), config.clone()),
        )
        .nest("/api/tailor", tailor_api_router(shared_db, config))
        .layer(from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
}
