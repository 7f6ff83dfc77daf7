use sea_orm::{
    prelude::DateTimeUtc, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::Serialize;
use tracing::info;

use crate::entities::{favorite_dress, favorite_tailor, pre_designed, tailor};
use crate::error::ServiceError;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Toggled {
    /// `true` when the item is now a favorite.
    pub favorite: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct FavoriteTailor {
    pub added_on: DateTimeUtc,
    pub tailor: tailor::Model,
}

#[derive(Clone, Debug, Serialize)]
pub struct FavoriteDress {
    pub added_on: DateTimeUtc,
    pub dress: pre_designed::Model,
}

pub async fn toggle_favorite_tailor<C: ConnectionTrait>(
    db: &C,
    customer_id: i32,
    tailor_id: i32,
    now: DateTimeUtc,
) -> Result<Toggled, ServiceError> {
    tailor::Entity::find_by_id(tailor_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Tailor", tailor_id))?;

    let existing = favorite_tailor::Entity::find()
        .filter(favorite_tailor::Column::CustomerId.eq(customer_id))
        .filter(favorite_tailor::Column::TailorId.eq(tailor_id))
        .one(db)
        .await?;

    let favorite = match existing {
        Some(entry) => {
            favorite_tailor::Entity::delete_by_id(entry.id).exec(db).await?;
            false
        }
        None => {
            favorite_tailor::ActiveModel {
                customer_id: Set(customer_id),
                tailor_id: Set(tailor_id),
                added_on: Set(now),
                ..Default::default()
            }
            .insert(db)
            .await?;
            true
        }
    };

    info!(customer_id, tailor_id, favorite, "Toggled favorite tailor");
    Ok(Toggled { favorite })
}

pub async fn toggle_favorite_dress<C: ConnectionTrait>(
    db: &C,
    customer_id: i32,
    dress_id: i32,
    now: DateTimeUtc,
) -> Result<Toggled, ServiceError> {
    pre_designed::Entity::find_by_id(dress_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Dress", dress_id))?;

    let existing = favorite_dress::Entity::find()
        .filter(favorite_dress::Column::CustomerId.eq(customer_id))
        .filter(favorite_dress::Column::PreDesignedId.eq(dress_id))
        .one(db)
        .await?;

    let favorite = match existing {
        Some(entry) => {
            favorite_dress::Entity::delete_by_id(entry.id).exec(db).await?;
            false
        }
        None => {
            favorite_dress::ActiveModel {
                customer_id: Set(customer_id),
                pre_designed_id: Set(dress_id),
                added_on: Set(now),
                ..Default::default()
            }
            .insert(db)
            .await?;
            true
        }
    };

    info!(customer_id, dress_id, favorite, "Toggled favorite dress");
    Ok(Toggled { favorite })
}

pub async fn favorite_tailors<C: ConnectionTrait>(
    db: &C,
    customer_id: i32,
) -> Result<Vec<FavoriteTailor>, ServiceError> {
    Ok(favorite_tailor::Entity::find()
        .filter(favorite_tailor::Column::CustomerId.eq(customer_id))
        .order_by_desc(favorite_tailor::Column::AddedOn)
        .find_also_related(tailor::Entity)
        .all(db)
        .await?
        .into_iter()
        .filter_map(|(entry, tailor)| {
            tailor.map(|tailor| FavoriteTailor {
                added_on: entry.added_on,
                tailor,
            })
        })
        .collect())
}

pub async fn favorite_dresses<C: ConnectionTrait>(
    db: &C,
    customer_id: i32,
) -> Result<Vec<FavoriteDress>, ServiceError> {
    Ok(favorite_dress::Entity::find()
        .filter(favorite_dress::Column::CustomerId.eq(customer_id))
        .order_by_desc(favorite_dress::Column::AddedOn)
        .find_also_related(pre_designed::Entity)
        .all(db)
        .await?
        .into_iter()
        .filter_map(|(entry, dress)| {
            dress.map(|dress| FavoriteDress {
                added_on: entry.added_on,
                dress,
            })
        })
        .collect())
}
