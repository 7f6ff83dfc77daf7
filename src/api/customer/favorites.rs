use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Response,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use sea_orm::{DatabaseConnection, TransactionTrait};
use std::sync::Arc;

use crate::error::ServiceError;
use crate::middleware::{auth::Claims, logging::to_response};
use crate::services::{accounts, favorites};

pub fn favorites_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/favorites/tailors", get(get_favorite_tailors))
        .route("/favorites/tailors/:id", post(toggle_tailor))
        .route("/favorites/dresses", get(get_favorite_dresses))
        .route("/favorites/dresses/:id", post(toggle_dress))
        .layer(Extension(db))
}

async fn toggle_tailor(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
) -> Result<Response, ServiceError> {
    let txn = db.begin().await?;
    let customer = accounts::customer_for_user(&txn, claims.user_id).await?;
    let toggled = favorites::toggle_favorite_tailor(&txn, customer.id, id, Utc::now()).await?;
    txn.commit().await?;
    Ok(to_response((StatusCode::OK, Json(toggled)), Ok(())))
}

async fn toggle_dress(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
) -> Result<Response, ServiceError> {
    let txn = db.begin().await?;
    let customer = accounts::customer_for_user(&txn, claims.user_id).await?;
    let toggled = favorites::toggle_favorite_dress(&txn, customer.id, id, Utc::now()).await?;
    txn.commit().await?;
    Ok(to_response((StatusCode::OK, Json(toggled)), Ok(())))
}

async fn get_favorite_tailors(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
) -> Result<Response, ServiceError> {
    let customer = accounts::customer_for_user(&*db, claims.user_id).await?;
    let tailors = favorites::favorite_tailors(&*db, customer.id).await?;
    Ok(to_response((StatusCode::OK, Json(tailors)), Ok(())))
}

async fn get_favorite_dresses(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
) -> Result<Response, ServiceError> {
    let customer = accounts::customer_for_user(&*db, claims.user_id).await?;
    let dresses = favorites::favorite_dresses(&*db, customer.id).await?;
    Ok(to_response((StatusCode::OK, Json(dresses)), Ok(())))
}
