use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::error::ServiceError;
use crate::middleware::logging::to_response;
use crate::services::{
    catalog::{self, DressQuery, TailorQuery},
    reviews,
};

//ROUTERS
pub fn catalog_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/tailors", get(get_tailors))
        .route("/tailors/:id", get(get_tailor))
        .route("/tailors/:id/embroideries", get(get_tailor_embroideries))
        .route("/tailors/:id/fabrics", get(get_tailor_fabrics))
        .route("/tailors/:id/reviews", get(get_tailor_reviews))
        .route("/dresses", get(get_dresses))
        .route("/dresses/:id", get(get_dress))
        .route("/dresses/:id/reviews", get(get_dress_reviews))
        .layer(Extension(db))
}

//ROUTES
async fn get_tailors(
    Query(params): Query<TailorQuery>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ServiceError> {
    let tailors = catalog::search_tailors(&*db, params).await?;
    Ok(to_response((StatusCode::OK, Json(tailors)), Ok(())))
}

async fn get_tailor(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ServiceError> {
    let detail = catalog::tailor_detail(&*db, id).await?;
    Ok(to_response((StatusCode::OK, Json(detail)), Ok(())))
}

async fn get_tailor_embroideries(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ServiceError> {
    catalog::ensure_tailor(&*db, id).await?;
    let embroideries = catalog::embroideries_of(&*db, id).await?;
    Ok(to_response((StatusCode::OK, Json(embroideries)), Ok(())))
}

async fn get_tailor_fabrics(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ServiceError> {
    catalog::ensure_tailor(&*db, id).await?;
    let fabrics = catalog::fabrics_of(&*db, id, true).await?;
    Ok(to_response((StatusCode::OK, Json(fabrics)), Ok(())))
}

async fn get_tailor_reviews(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ServiceError> {
    let reviews = reviews::reviews_for_tailor(&*db, id).await?;
    Ok(to_response((StatusCode::OK, Json(reviews)), Ok(())))
}

async fn get_dresses(
    Query(params): Query<DressQuery>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ServiceError> {
    let dresses = catalog::list_dresses(&*db, params).await?;
    Ok(to_response((StatusCode::OK, Json(dresses)), Ok(())))
}

async fn get_dress(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ServiceError> {
    let dress = catalog::dress_detail(&*db, id).await?;
    Ok(to_response((StatusCode::OK, Json(dress)), Ok(())))
}

async fn get_dress_reviews(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Result<Response, ServiceError> {
    let reviews = reviews::reviews_for_dress(&*db, id).await?;
    Ok(to_response((StatusCode::OK, Json(reviews)), Ok(())))
}
