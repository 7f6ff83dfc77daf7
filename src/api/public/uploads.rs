use axum::routing::get;
use axum::{
    extract::{Extension, Path},
    http::{header, HeaderMap, HeaderValue},
    response::Response,
    Router,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tokio_util::io::ReaderStream;
use tracing::warn;

use crate::config::AppConfig;
use crate::error::ServiceError;
use crate::middleware::logging::to_response;
use crate::services::catalog;

pub fn uploads_router(db: Arc<DatabaseConnection>, config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/image/:id", get(print_image))
        .layer(Extension(db))
        .layer(Extension(config))
}

pub async fn print_image(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(config): Extension<Arc<AppConfig>>,
) -> Result<Response, ServiceError> {
    let model = catalog::find_image(&*db, id).await?;
    let path = config.upload_dir.join(model.stored_name());

    let file = match tokio::fs::File::open(&path).await {
        Ok(file) => file,
        Err(err) => {
            warn!(image_id = id, path = %path.display(), error = %err, "Image row without a file");
            return Err(ServiceError::NotFound("Not found".to_string()));
        }
    };

    let content_type = mime_guess::from_path(&path)
        .first_raw()
        .unwrap_or("application/octet-stream");

    let stream = ReaderStream::new(file);
    let body = axum::body::Body::from_stream(stream);

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(content_type)
            .unwrap_or(HeaderValue::from_static("application/octet-stream")),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_static("inline"),
    );

    Ok(to_response((headers, body), Ok(())))
}
