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

use crate::config::AppConfig;
use crate::error::ServiceError;
use crate::middleware::{auth::Claims, logging::to_response};
use crate::services::{
    accounts,
    orders::{self, NewCustomOrder, NewDressOrder},
};

pub fn orders_router(db: Arc<DatabaseConnection>, config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/orders", get(get_orders))
        .route("/orders/custom/:tailor_id", post(create_custom_order))
        .route("/orders/dress", post(create_dress_order))
        .route("/dashboard", get(get_dashboard))
        .layer(Extension(db))
        .layer(Extension(config))
}

async fn create_custom_order(
    Path(tailor_id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(config): Extension<Arc<AppConfig>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<NewCustomOrder>,
) -> Result<Response, ServiceError> {
    let txn = db.begin().await?;
    let customer = accounts::customer_for_user(&txn, claims.user_id).await?;
    let placed = orders::create_custom_order(
        &txn,
        &config.calendar,
        customer.id,
        tailor_id,
        payload,
        Utc::now(),
    )
    .await?;
    txn.commit().await?;
    Ok(to_response((StatusCode::CREATED, Json(placed)), Ok(())))
}

async fn create_dress_order(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<NewDressOrder>,
) -> Result<Response, ServiceError> {
    let txn = db.begin().await?;
    let placed = orders::create_dress_order(&txn, claims.user_id, payload, Utc::now()).await?;
    txn.commit().await?;
    Ok(to_response((StatusCode::CREATED, Json(placed)), Ok(())))
}

async fn get_orders(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
) -> Result<Response, ServiceError> {
    let txn = db.begin().await?;
    let customer = accounts::customer_for_user(&txn, claims.user_id).await?;
    let all_orders = orders::list_orders_for_customer(&txn, customer.id).await?;
    txn.commit().await?;
    Ok(to_response((StatusCode::OK, Json(all_orders)), Ok(())))
}

async fn get_dashboard(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
) -> Result<Response, ServiceError> {
    let txn = db.begin().await?;
    let customer = accounts::customer_for_user(&txn, claims.user_id).await?;
    let dashboard = orders::customer_dashboard(&txn, customer.id).await?;
    txn.commit().await?;
    Ok(to_response((StatusCode::OK, Json(dashboard)), Ok(())))
}
