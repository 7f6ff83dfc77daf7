use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Response,
    routing::{patch, post},
    Json, Router,
};
use chrono::Utc;
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde_json::json;
use std::sync::Arc;

use crate::error::ServiceError;
use crate::middleware::{auth::Claims, logging::to_response};
use crate::services::{
    accounts,
    reviews::{self, NewReview, PatchReview},
};

pub fn reviews_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/reviews", post(create_review))
        .route("/reviews/:id", patch(patch_review).delete(delete_review))
        .layer(Extension(db))
}

async fn create_review(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<NewReview>,
) -> Result<Response, ServiceError> {
    let txn = db.begin().await?;
    let customer = accounts::customer_for_user(&txn, claims.user_id).await?;
    let review = reviews::create_review(&txn, customer.id, payload, Utc::now()).await?;
    txn.commit().await?;
    Ok(to_response((StatusCode::CREATED, Json(review)), Ok(())))
}

async fn patch_review(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<PatchReview>,
) -> Result<Response, ServiceError> {
    let txn = db.begin().await?;
    let customer = accounts::customer_for_user(&txn, claims.user_id).await?;
    let review = reviews::update_review(&txn, customer.id, id, payload).await?;
    txn.commit().await?;
    Ok(to_response((StatusCode::OK, Json(review)), Ok(())))
}

async fn delete_review(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
) -> Result<Response, ServiceError> {
    let txn = db.begin().await?;
    let customer = accounts::customer_for_user(&txn, claims.user_id).await?;
    reviews::delete_review(&txn, customer.id, id).await?;
    txn.commit().await?;
    Ok(to_response(
        (
            StatusCode::OK,
            Json(json!({
                "message": "Review deleted successfully"
            })),
        ),
        Ok(()),
    ))
}
