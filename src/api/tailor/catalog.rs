use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Response,
    routing::{get, patch},
    Json, Router,
};
use chrono::Utc;
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde_json::json;
use std::sync::Arc;

use super::remove_files;
use crate::config::AppConfig;
use crate::error::ServiceError;
use crate::middleware::{auth::Claims, logging::to_response};
use crate::services::{
    accounts,
    catalog::{
        self, NewDress, NewEmbroidery, NewFabric, PatchDress, PatchEmbroidery, PatchFabric,
    },
};

//ROUTERS
pub fn catalog_router(db: Arc<DatabaseConnection>, config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/dresses", get(get_dresses).post(create_dress))
        .route("/dresses/:id", patch(patch_dress).delete(delete_dress))
        .route("/embroideries", get(get_embroideries).post(create_embroidery))
        .route(
            "/embroideries/:id",
            patch(patch_embroidery).delete(delete_embroidery),
        )
        .route("/fabrics", get(get_fabrics).post(create_fabric))
        .route("/fabrics/:id", patch(patch_fabric).delete(delete_fabric))
        .layer(Extension(db))
        .layer(Extension(config))
}

fn deleted(what: &str) -> Response {
    to_response(
        (
            StatusCode::OK,
            Json(json!({
                "message": format!("{what} deleted successfully")
            })),
        ),
        Ok(()),
    )
}

//DRESSES
async fn get_dresses(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
) -> Result<Response, ServiceError> {
    let tailor = accounts::tailor_for_user(&*db, claims.user_id).await?;
    let dresses = catalog::own_dresses(&*db, tailor.id).await?;
    Ok(to_response((StatusCode::OK, Json(dresses)), Ok(())))
}

async fn create_dress(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<NewDress>,
) -> Result<Response, ServiceError> {
    let txn = db.begin().await?;
    let tailor = accounts::tailor_for_user(&txn, claims.user_id).await?;
    let dress = catalog::create_dress(&txn, tailor.id, payload, Utc::now()).await?;
    txn.commit().await?;
    Ok(to_response((StatusCode::CREATED, Json(dress)), Ok(())))
}

async fn patch_dress(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<PatchDress>,
) -> Result<Response, ServiceError> {
    let txn = db.begin().await?;
    let tailor = accounts::tailor_for_user(&txn, claims.user_id).await?;
    let dress = catalog::update_dress(&txn, tailor.id, id, payload, Utc::now()).await?;
    txn.commit().await?;
    Ok(to_response((StatusCode::OK, Json(dress)), Ok(())))
}

async fn delete_dress(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(config): Extension<Arc<AppConfig>>,
    Extension(claims): Extension<Claims>,
) -> Result<Response, ServiceError> {
    let txn = db.begin().await?;
    let tailor = accounts::tailor_for_user(&txn, claims.user_id).await?;
    let files = catalog::delete_dress(&txn, tailor.id, id).await?;
    txn.commit().await?;
    remove_files(&config, &files).await;
    Ok(deleted("Dress"))
}

//EMBROIDERY
async fn get_embroideries(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
) -> Result<Response, ServiceError> {
    let tailor = accounts::tailor_for_user(&*db, claims.user_id).await?;
    let embroideries = catalog::embroideries_of(&*db, tailor.id).await?;
    Ok(to_response((StatusCode::OK, Json(embroideries)), Ok(())))
}

async fn create_embroidery(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<NewEmbroidery>,
) -> Result<Response, ServiceError> {
    let txn = db.begin().await?;
    let tailor = accounts::tailor_for_user(&txn, claims.user_id).await?;
    let created = catalog::create_embroidery(&txn, tailor.id, payload, Utc::now()).await?;
    txn.commit().await?;
    Ok(to_response((StatusCode::CREATED, Json(created)), Ok(())))
}

async fn patch_embroidery(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<PatchEmbroidery>,
) -> Result<Response, ServiceError> {
    let txn = db.begin().await?;
    let tailor = accounts::tailor_for_user(&txn, claims.user_id).await?;
    let updated = catalog::update_embroidery(&txn, tailor.id, id, payload, Utc::now()).await?;
    txn.commit().await?;
    Ok(to_response((StatusCode::OK, Json(updated)), Ok(())))
}

async fn delete_embroidery(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
) -> Result<Response, ServiceError> {
    let txn = db.begin().await?;
    let tailor = accounts::tailor_for_user(&txn, claims.user_id).await?;
    catalog::delete_embroidery(&txn, tailor.id, id).await?;
    txn.commit().await?;
    Ok(deleted("Embroidery"))
}

//FABRICS
async fn get_fabrics(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
) -> Result<Response, ServiceError> {
    let tailor = accounts::tailor_for_user(&*db, claims.user_id).await?;
    let fabrics = catalog::fabrics_of(&*db, tailor.id, false).await?;
    Ok(to_response((StatusCode::OK, Json(fabrics)), Ok(())))
}

async fn create_fabric(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<NewFabric>,
) -> Result<Response, ServiceError> {
    let txn = db.begin().await?;
    let tailor = accounts::tailor_for_user(&txn, claims.user_id).await?;
    let created = catalog::create_fabric(&txn, tailor.id, payload, Utc::now()).await?;
    txn.commit().await?;
    Ok(to_response((StatusCode::CREATED, Json(created)), Ok(())))
}

async fn patch_fabric(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<PatchFabric>,
) -> Result<Response, ServiceError> {
    let txn = db.begin().await?;
    let tailor = accounts::tailor_for_user(&txn, claims.user_id).await?;
    let updated = catalog::update_fabric(&txn, tailor.id, id, payload, Utc::now()).await?;
    txn.commit().await?;
    Ok(to_response((StatusCode::OK, Json(updated)), Ok(())))
}

async fn delete_fabric(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
) -> Result<Response, ServiceError> {
    let txn = db.begin().await?;
    let tailor = accounts::tailor_for_user(&txn, claims.user_id).await?;
    catalog::delete_fabric(&txn, tailor.id, id).await?;
    txn.commit().await?;
    Ok(deleted("Fabric"))
}
