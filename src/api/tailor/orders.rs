use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Response,
    routing::{get, patch},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::ServiceError;
use crate::lifecycle::OrderKind;
use crate::middleware::{auth::Claims, logging::to_response};
use crate::services::{accounts, orders};

pub fn orders_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/orders", get(get_orders))
        .route("/orders/:kind/:id/status", patch(patch_status))
        .route("/orders/:kind/:id/milestone", patch(patch_milestone))
        .route("/dashboard", get(get_dashboard))
        .layer(Extension(db))
}

async fn get_orders(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
) -> Result<Response, ServiceError> {
    let txn = db.begin().await?;
    let tailor = accounts::tailor_for_user(&txn, claims.user_id).await?;
    let all_orders = orders::list_orders_for_tailor(&txn, tailor.id).await?;
    txn.commit().await?;
    Ok(to_response((StatusCode::OK, Json(all_orders)), Ok(())))
}

async fn get_dashboard(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
) -> Result<Response, ServiceError> {
    let txn = db.begin().await?;
    let tailor = accounts::tailor_for_user(&txn, claims.user_id).await?;
    let dashboard = orders::tailor_dashboard(&txn, tailor.id).await?;
    txn.commit().await?;
    Ok(to_response((StatusCode::OK, Json(dashboard)), Ok(())))
}

async fn patch_status(
    Path((kind, id)): Path<(String, i32)>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<StatusPayload>,
) -> Result<Response, ServiceError> {
    let kind: OrderKind = kind.parse()?;
    let txn = db.begin().await?;
    let tailor = accounts::tailor_for_user(&txn, claims.user_id).await?;
    let change = orders::update_order_status(
        &txn,
        tailor.id,
        kind,
        id,
        &payload.status,
        Utc::now().date_naive(),
    )
    .await?;
    txn.commit().await?;
    Ok(to_response((StatusCode::OK, Json(change)), Ok(())))
}

async fn patch_milestone(
    Path((kind, id)): Path<(String, i32)>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<MilestonePayload>,
) -> Result<Response, ServiceError> {
    let kind: OrderKind = kind.parse()?;
    let txn = db.begin().await?;
    let tailor = accounts::tailor_for_user(&txn, claims.user_id).await?;
    let change =
        orders::update_milestone_date(&txn, tailor.id, kind, id, &payload.milestone, payload.date)
            .await?;
    txn.commit().await?;
    Ok(to_response((StatusCode::OK, Json(change)), Ok(())))
}

//Structs
#[derive(Deserialize, Debug)]
struct StatusPayload {
    status: String,
}

#[derive(Deserialize, Debug)]
struct MilestonePayload {
    milestone: String,
    /// `null` clears the milestone.
    date: Option<NaiveDate>,
}
