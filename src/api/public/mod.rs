pub mod auth;
pub mod catalog;
pub mod uploads;

use axum::{http::StatusCode, response::Response, routing::get, Json, Router};
use sea_orm::DatabaseConnection;
use serde_json::json;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::middleware::logging::to_response;
use auth::auth_router;
use catalog::catalog_router;
use uploads::uploads_router;

pub fn public_api_router(db: Arc<DatabaseConnection>, config: Arc<AppConfig>) -> Router {
    let auth_router = auth_router(db.clone(), config.clone());
    let catalog_router = catalog_router(db.clone());
    let uploads_router = uploads_router(db, config);

    Router::new()
        .route("/", get(health))
        .merge(auth_router)
        .nest("/api", catalog_router.merge(uploads_router))
}

async fn health() -> Response {
    to_response((StatusCode::OK, Json(json!({ "status": "ok" }))), Ok(()))
}
