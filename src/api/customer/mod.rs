pub mod favorites;
pub mod orders;
pub mod profile;
pub mod reviews;

use axum::{middleware::from_fn_with_state, Router};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::entities::user::Role;
use crate::middleware::auth::{auth_middleware, AuthState};
use favorites::favorites_router;
use orders::orders_router;
use profile::profile_router;
use reviews::reviews_router;

pub fn customer_api_router(db: Arc<DatabaseConnection>, config: Arc<AppConfig>) -> Router {
    let profile_router = profile_router(db.clone());
    let orders_router = orders_router(db.clone(), config.clone());
    let reviews_router = reviews_router(db.clone());
    let favorites_router = favorites_router(db.clone());

    Router::new()
        .merge(profile_router)
        .merge(orders_router)
        .merge(reviews_router)
        .merge(favorites_router)
        .layer(from_fn_with_state(
            AuthState {
                db,
                role: Role::Customer,
                secret: Arc::new(config.secret.clone()),
            },
            auth_middleware,
        ))
}
