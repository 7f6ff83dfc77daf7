use axum::{
    extract::{DefaultBodyLimit, Extension, Multipart, Path},
    http::StatusCode,
    response::Response,
    routing::{delete, post},
    Json, Router,
};
use once_cell::sync::Lazy;
use regex::Regex;
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde_json::json;
use std::sync::Arc;

use super::remove_files;
use crate::config::AppConfig;
use crate::entities::image::FileExtension;
use crate::error::ServiceError;
use crate::middleware::{auth::Claims, logging::to_response};
use crate::services::{accounts, catalog};

static FILE_NAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]+$").expect("file name pattern is valid")
});

/// Room for multipart boundaries and headers on top of the file itself.
const MULTIPART_SLACK: usize = 64 * 1024;

pub fn upload_router(db: Arc<DatabaseConnection>, config: Arc<AppConfig>) -> Router {
    let body_limit = config.file_size_limit + MULTIPART_SLACK;
    Router::new()
        .route("/dresses/:id/images", post(upload))
        .route("/images/:id", delete(delete_image))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(Extension(db))
        .layer(Extension(config))
}

async fn upload(
    Path(dress_id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(config): Extension<Arc<AppConfig>>,
    Extension(claims): Extension<Claims>,
    mut multipart: Multipart,
) -> Result<Response, ServiceError> {
    let field = multipart
        .next_field()
        .await
        .map_err(|err| ServiceError::Validation(format!("Malformed multipart body: {err}")))?
        .ok_or_else(|| ServiceError::Validation("No file was sent".to_string()))?;

    let content_type = field
        .content_type()
        .ok_or_else(|| ServiceError::Validation("Content type is not set".to_string()))?
        .to_owned();
    let extension = FileExtension::from_content_type(&content_type)
        .ok_or_else(|| ServiceError::Validation("Unsupported content type".to_string()))?;

    let file_name = field
        .name()
        .ok_or_else(|| ServiceError::Validation("File name is not set".to_string()))?
        .to_owned();
    if !FILE_NAME_REGEX.is_match(&file_name) {
        return Err(ServiceError::Validation(
            "Invalid file name. It should contain only Latin letters, numbers, '-', or '_'"
                .to_string(),
        ));
    }

    let data = field
        .bytes()
        .await
        .map_err(|err| ServiceError::Validation(format!("Failed to read file bytes: {err}")))?;
    if data.len() > config.file_size_limit {
        let tmp = "Payload too large";
        return Ok(to_response(
            (StatusCode::PAYLOAD_TOO_LARGE, Json(json!({ "error": tmp }))),
            Err(ServiceError::Validation(tmp.to_string())),
        ));
    }

    let txn = db.begin().await?;
    let tailor = accounts::tailor_for_user(&txn, claims.user_id).await?;
    let img = catalog::add_image(&txn, tailor.id, dress_id, file_name, extension).await?;

    let path = config.upload_dir.join(img.stored_name());
    if let Err(err) = tokio::fs::write(&path, data).await {
        txn.rollback().await?;
        return Err(ServiceError::Storage(format!(
            "{}: {err}",
            path.display()
        )));
    }
    txn.commit().await?;

    Ok(to_response((StatusCode::CREATED, Json(img)), Ok(())))
}

async fn delete_image(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(config): Extension<Arc<AppConfig>>,
    Extension(claims): Extension<Claims>,
) -> Result<Response, ServiceError> {
    let txn = db.begin().await?;
    let tailor = accounts::tailor_for_user(&txn, claims.user_id).await?;
    let img = catalog::delete_image(&txn, tailor.id, id).await?;
    txn.commit().await?;
    remove_files(&config, &[img.stored_name()]).await;
    Ok(to_response(
        (
            StatusCode::OK,
            Json(json!({
                "message": "Image deleted successfully"
            })),
        ),
        Ok(()),
    ))
}
