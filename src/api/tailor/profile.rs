use axum::{
    extract::Extension,
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde_json::json;
use std::sync::Arc;

use super::remove_files;
use crate::config::AppConfig;
use crate::error::ServiceError;
use crate::middleware::{auth::Claims, logging::to_response};
use crate::services::accounts::{self, PatchTailorProfile};

pub fn profile_router(db: Arc<DatabaseConnection>, config: Arc<AppConfig>) -> Router {
    Router::new()
        .route(
            "/profile",
            get(get_profile).patch(patch_profile).delete(delete_profile),
        )
        .layer(Extension(db))
        .layer(Extension(config))
}

async fn get_profile(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
) -> Result<Response, ServiceError> {
    let profile = accounts::get_tailor_profile(&*db, claims.user_id).await?;
    Ok(to_response((StatusCode::OK, Json(profile)), Ok(())))
}

async fn patch_profile(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<PatchTailorProfile>,
) -> Result<Response, ServiceError> {
    let txn = db.begin().await?;
    let profile = accounts::patch_tailor_profile(&txn, claims.user_id, payload).await?;
    txn.commit().await?;
    Ok(to_response((StatusCode::OK, Json(profile)), Ok(())))
}

async fn delete_profile(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(config): Extension<Arc<AppConfig>>,
    Extension(claims): Extension<Claims>,
) -> Result<Response, ServiceError> {
    let txn = db.begin().await?;
    let files = accounts::delete_account(&txn, claims.user_id).await?;
    txn.commit().await?;
    remove_files(&config, &files).await;
    Ok(to_response(
        (
            StatusCode::OK,
            Json(json!({
                "message": "Account deleted successfully"
            })),
        ),
        Ok(()),
    ))
}
