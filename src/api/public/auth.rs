use axum::{
    extract::Extension,
    http::StatusCode,
    response::Response,
    routing::post,
    Json, Router,
};
use sea_orm::{DatabaseConnection, TransactionTrait};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::ServiceError;
use crate::middleware::logging::to_response;
use crate::services::accounts::{self, Login, RegisterCustomer, RegisterTailor};

pub fn auth_router(db: Arc<DatabaseConnection>, config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/register/customer", post(register_customer))
        .route("/register/tailor", post(register_tailor))
        .route("/login", post(login))
        .layer(Extension(db))
        .layer(Extension(config))
}

async fn register_customer(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<RegisterCustomer>,
) -> Result<Response, ServiceError> {
    let txn = db.begin().await?;
    let registered = accounts::register_customer(&txn, payload).await?;
    txn.commit().await?;
    Ok(to_response((StatusCode::CREATED, Json(registered)), Ok(())))
}

async fn register_tailor(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<RegisterTailor>,
) -> Result<Response, ServiceError> {
    let txn = db.begin().await?;
    let registered = accounts::register_tailor(&txn, payload).await?;
    txn.commit().await?;
    Ok(to_response((StatusCode::CREATED, Json(registered)), Ok(())))
}

async fn login(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(config): Extension<Arc<AppConfig>>,
    Json(payload): Json<Login>,
) -> Result<Response, ServiceError> {
    let response =
        accounts::login(&*db, payload, &config.secret, config.token_ttl_hours).await?;
    Ok(to_response((StatusCode::OK, Json(response)), Ok(())))
}
