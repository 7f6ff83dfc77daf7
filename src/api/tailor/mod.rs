pub mod catalog;
pub mod orders;
pub mod profile;
pub mod uploads;

use axum::{middleware::from_fn_with_state, Router};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::entities::user::Role;
use crate::middleware::auth::{auth_middleware, AuthState};
use catalog::catalog_router;
use orders::orders_router;
use profile::profile_router;
use uploads::upload_router;

pub fn tailor_api_router(db: Arc<DatabaseConnection>, config: Arc<AppConfig>) -> Router {
    let profile_router = profile_router(db.clone(), config.clone());
    let orders_router = orders_router(db.clone());
    let catalog_router = catalog_router(db.clone(), config.clone());
    let upload_router = upload_router(db.clone(), config.clone());

    Router::new()
        .merge(profile_router)
        .merge(orders_router)
        .merge(catalog_router)
        .merge(upload_router)
        .layer(from_fn_with_state(
            AuthState {
                db,
                role: Role::Tailor,
                secret: Arc::new(config.secret.clone()),
            },
            auth_middleware,
        ))
}

/// Removes stored image files whose rows are already gone. A file that
/// cannot be removed is only logged.
pub(crate) async fn remove_files(config: &AppConfig, stored_names: &[String]) {
    for name in stored_names {
        let path = config.upload_dir.join(name);
        if let Err(err) = tokio::fs::remove_file(&path).await {
            tracing::warn!(path = %path.display(), error = %err, "Failed to remove image file");
        }
    }
}
