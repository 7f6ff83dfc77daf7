use axum::{
    extract::Extension,
    http::StatusCode,
    response::Response,
    routing::{get, put},
    Json, Router,
};
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde_json::json;
use std::sync::Arc;

use crate::error::ServiceError;
use crate::middleware::{auth::Claims, logging::to_response};
use crate::services::accounts::{self, Measurements, PatchCustomerProfile};

pub fn profile_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route(
            "/profile",
            get(get_profile).patch(patch_profile).delete(delete_profile),
        )
        .route("/measurements", put(put_measurements))
        .layer(Extension(db))
}

async fn get_profile(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
) -> Result<Response, ServiceError> {
    let profile = accounts::get_customer_profile(&*db, claims.user_id).await?;
    Ok(to_response((StatusCode::OK, Json(profile)), Ok(())))
}

async fn patch_profile(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<PatchCustomerProfile>,
) -> Result<Response, ServiceError> {
    let txn = db.begin().await?;
    let profile = accounts::patch_customer_profile(&txn, claims.user_id, payload).await?;
    txn.commit().await?;
    Ok(to_response((StatusCode::OK, Json(profile)), Ok(())))
}

async fn put_measurements(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<Measurements>,
) -> Result<Response, ServiceError> {
    let txn = db.begin().await?;
    let measurements = accounts::replace_measurements(&txn, claims.user_id, payload).await?;
    txn.commit().await?;
    Ok(to_response((StatusCode::OK, Json(measurements)), Ok(())))
}

async fn delete_profile(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
) -> Result<Response, ServiceError> {
    let txn = db.begin().await?;
    accounts::delete_account(&txn, claims.user_id).await?;
    txn.commit().await?;
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
