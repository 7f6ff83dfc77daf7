use sea_orm::{
    prelude::DateTimeUtc, ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;
use validator::Validate;

use super::non_blank;
use crate::entities::{customer, pre_designed, review, tailor, user};
use crate::error::ServiceError;

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct NewReview {
    /// May be left out when `product_id` is given.
    pub tailor_id: Option<i32>,
    pub product_id: Option<i32>,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Validate)]
pub struct PatchReview {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: Option<i32>,
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ReviewView {
    #[serde(flatten)]
    pub review: review::Model,
    pub customer_name: Option<String>,
}

fn duplicate_review(product_id: i32) -> ServiceError {
    ServiceError::Conflict(format!("You have already reviewed dress {product_id}"))
}

/// Recomputes the tailor's mean rating from every review it has.
async fn refresh_average_rating<C: ConnectionTrait>(
    db: &C,
    tailor_id: i32,
) -> Result<f64, ServiceError> {
    let ratings: Vec<i32> = review::Entity::find()
        .select_only()
        .column(review::Column::Rating)
        .filter(review::Column::TailorId.eq(tailor_id))
        .into_tuple()
        .all(db)
        .await?;
    let average = if ratings.is_empty() {
        0.0
    } else {
        let sum: i32 = ratings.iter().sum();
        (f64::from(sum) / ratings.len() as f64 * 100.0).round() / 100.0
    };

    let tailor = tailor::Entity::find_by_id(tailor_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Tailor", tailor_id))?;
    let mut active: tailor::ActiveModel = tailor.into();
    active.average_rating = Set(average);
    active.update(db).await?;
    Ok(average)
}

pub async fn create_review<C: ConnectionTrait>(
    db: &C,
    customer_id: i32,
    payload: NewReview,
    now: DateTimeUtc,
) -> Result<review::Model, ServiceError> {
    payload.validate()?;

    let tailor_id = match payload.product_id {
        Some(product_id) => {
            let product = pre_designed::Entity::find_by_id(product_id)
                .one(db)
                .await?
                .ok_or_else(|| ServiceError::not_found("Dress", product_id))?;
            if payload.tailor_id.is_some_and(|id| id != product.tailor_id) {
                return Err(ServiceError::Validation(format!(
                    "Dress {product_id} is not sold by tailor {}",
                    payload.tailor_id.unwrap_or_default()
                )));
            }
            product.tailor_id
        }
        None => {
            let tailor_id = payload.tailor_id.ok_or_else(|| {
                ServiceError::Validation("tailor_id or product_id is required".to_string())
            })?;
            tailor::Entity::find_by_id(tailor_id)
                .one(db)
                .await?
                .ok_or_else(|| ServiceError::not_found("Tailor", tailor_id))?
                .id
        }
    };

    customer::Entity::find_by_id(customer_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Customer", customer_id))?;

    if let Some(product_id) = payload.product_id {
        let existing = review::Entity::find()
            .filter(review::Column::CustomerId.eq(customer_id))
            .filter(review::Column::ProductId.eq(product_id))
            .one(db)
            .await?;
        if existing.is_some() {
            return Err(duplicate_review(product_id));
        }
    }

    let created = review::ActiveModel {
        customer_id: Set(customer_id),
        tailor_id: Set(tailor_id),
        product_id: Set(payload.product_id),
        rating: Set(payload.rating),
        comment: Set(non_blank(payload.comment)),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(|err: DbErr| match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            duplicate_review(payload.product_id.unwrap_or_default())
        }
        _ => err.into(),
    })?;

    let average = refresh_average_rating(db, tailor_id).await?;
    info!(
        review_id = created.id,
        customer_id,
        tailor_id,
        rating = created.rating,
        average,
        "Created review"
    );
    Ok(created)
}

async fn own_review<C: ConnectionTrait>(
    db: &C,
    customer_id: i32,
    review_id: i32,
) -> Result<review::Model, ServiceError> {
    review::Entity::find_by_id(review_id)
        .filter(review::Column::CustomerId.eq(customer_id))
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Review", review_id))
}

pub async fn update_review<C: ConnectionTrait>(
    db: &C,
    customer_id: i32,
    review_id: i32,
    payload: PatchReview,
) -> Result<review::Model, ServiceError> {
    payload.validate()?;
    let existing = own_review(db, customer_id, review_id).await?;
    let tailor_id = existing.tailor_id;

    let mut active: review::ActiveModel = existing.into();
    if let Some(rating) = payload.rating {
        active.rating = Set(rating);
    }
    if let Some(comment) = payload.comment {
        active.comment = Set(non_blank(Some(comment)));
    }
    let updated = active.update(db).await?;

    refresh_average_rating(db, tailor_id).await?;
    info!(review_id, customer_id, "Updated review");
    Ok(updated)
}

pub async fn delete_review<C: ConnectionTrait>(
    db: &C,
    customer_id: i32,
    review_id: i32,
) -> Result<(), ServiceError> {
    let existing = own_review(db, customer_id, review_id).await?;
    let tailor_id = existing.tailor_id;
    review::Entity::delete_by_id(existing.id).exec(db).await?;

    refresh_average_rating(db, tailor_id).await?;
    info!(review_id, customer_id, "Deleted review");
    Ok(())
}

async fn with_customer_names<C: ConnectionTrait>(
    db: &C,
    reviews: Vec<review::Model>,
) -> Result<Vec<ReviewView>, ServiceError> {
    let customer_ids: Vec<i32> = reviews.iter().map(|r| r.customer_id).collect();
    let customers = customer::Entity::find()
        .filter(customer::Column::Id.is_in(customer_ids))
        .find_also_related(user::Entity)
        .all(db)
        .await?;
    let names: HashMap<i32, String> = customers
        .into_iter()
        .filter_map(|(c, u)| u.map(|u| (c.id, u.full_name())))
        .collect();

    Ok(reviews
        .into_iter()
        .map(|review| ReviewView {
            customer_name: names.get(&review.customer_id).cloned(),
            review,
        })
        .collect())
}

pub async fn reviews_for_tailor<C: ConnectionTrait>(
    db: &C,
    tailor_id: i32,
) -> Result<Vec<ReviewView>, ServiceError> {
    tailor::Entity::find_by_id(tailor_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Tailor", tailor_id))?;
    let reviews = review::Entity::find()
        .filter(review::Column::TailorId.eq(tailor_id))
        .order_by_desc(review::Column::CreatedAt)
        .all(db)
        .await?;
    with_customer_names(db, reviews).await
}

pub async fn reviews_for_dress<C: ConnectionTrait>(
    db: &C,
    product_id: i32,
) -> Result<Vec<ReviewView>, ServiceError> {
    pre_designed::Entity::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Dress", product_id))?;
    let reviews = review::Entity::find()
        .filter(review::Column::ProductId.eq(product_id))
        .order_by_desc(review::Column::CreatedAt)
        .all(db)
        .await?;
    with_customer_names(db, reviews).await
}
