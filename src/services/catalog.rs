use rust_decimal::Decimal;
use sea_orm::{
    prelude::DateTimeUtc, ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::{non_blank, require};
use crate::entities::{
    embroidery::{self, Complexity},
    fabric::{self, FabricType, Pattern},
    image::{self, FileExtension},
    pre_designed::{self, DressCategory, Gender},
    review, tailor, user,
};
use crate::error::ServiceError;
use crate::lifecycle::pricing::check_price_limit;

fn positive(value: Decimal, field: &str) -> Result<Decimal, ServiceError> {
    if value <= Decimal::ZERO {
        return Err(ServiceError::Validation(format!("{field} must be greater than 0")));
    }
    check_price_limit(value.round_dp(2), field)
}

fn non_negative(value: Decimal, field: &str) -> Result<Decimal, ServiceError> {
    if value < Decimal::ZERO {
        return Err(ServiceError::Validation(format!("{field} cannot be negative")));
    }
    check_price_limit(value.round_dp(2), field)
}

// DRESSES

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct NewDress {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub availability: i32,
    pub price: Decimal,
    pub category: Option<DressCategory>,
    pub fabric_type: Option<String>,
    pub thread_type: Option<String>,
    pub color: Option<String>,
    #[validate(range(min = 0))]
    pub estimated_hours: Option<i32>,
    pub gender: Option<Gender>,
}

#[derive(Clone, Debug, Default, Deserialize, Validate)]
pub struct PatchDress {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0))]
    pub availability: Option<i32>,
    pub price: Option<Decimal>,
    pub category: Option<DressCategory>,
    pub fabric_type: Option<String>,
    pub thread_type: Option<String>,
    pub color: Option<String>,
    #[validate(range(min = 0))]
    pub estimated_hours: Option<i32>,
    pub gender: Option<Gender>,
}

#[derive(Clone, Debug, Serialize)]
pub struct DressView {
    #[serde(flatten)]
    pub dress: pre_designed::Model,
    pub image_ids: Vec<i32>,
    pub tailor_name: Option<String>,
}

async fn own_dress<C: ConnectionTrait>(
    db: &C,
    tailor_id: i32,
    dress_id: i32,
) -> Result<pre_designed::Model, ServiceError> {
    pre_designed::Entity::find_by_id(dress_id)
        .filter(pre_designed::Column::TailorId.eq(tailor_id))
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Dress", dress_id))
}

pub async fn create_dress<C: ConnectionTrait>(
    db: &C,
    tailor_id: i32,
    payload: NewDress,
    now: DateTimeUtc,
) -> Result<pre_designed::Model, ServiceError> {
    payload.validate()?;
    let dress = pre_designed::ActiveModel {
        tailor_id: Set(tailor_id),
        title: Set(require(&payload.title, "title")?),
        description: Set(non_blank(payload.description)),
        availability: Set(payload.availability),
        price: Set(positive(payload.price, "price")?),
        category: Set(payload.category),
        fabric_type: Set(non_blank(payload.fabric_type)),
        thread_type: Set(non_blank(payload.thread_type)),
        color: Set(non_blank(payload.color)),
        estimated_hours: Set(payload.estimated_hours),
        gender: Set(payload.gender),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(tailor_id, dress_id = dress.id, "Created dress");
    Ok(dress)
}

/// Existing orders keep the unit price they were placed with.
pub async fn update_dress<C: ConnectionTrait>(
    db: &C,
    tailor_id: i32,
    dress_id: i32,
    payload: PatchDress,
    now: DateTimeUtc,
) -> Result<pre_designed::Model, ServiceError> {
    payload.validate()?;
    let mut active: pre_designed::ActiveModel = own_dress(db, tailor_id, dress_id).await?.into();

    if let Some(title) = payload.title {
        active.title = Set(require(&title, "title")?);
    }
    if let Some(description) = payload.description {
        active.description = Set(non_blank(Some(description)));
    }
    if let Some(availability) = payload.availability {
        active.availability = Set(availability);
    }
    if let Some(price) = payload.price {
        active.price = Set(positive(price, "price")?);
    }
    if payload.category.is_some() {
        active.category = Set(payload.category);
    }
    if let Some(fabric_type) = payload.fabric_type {
        active.fabric_type = Set(non_blank(Some(fabric_type)));
    }
    if let Some(thread_type) = payload.thread_type {
        active.thread_type = Set(non_blank(Some(thread_type)));
    }
    if let Some(color) = payload.color {
        active.color = Set(non_blank(Some(color)));
    }
    if payload.estimated_hours.is_some() {
        active.estimated_hours = Set(payload.estimated_hours);
    }
    if payload.gender.is_some() {
        active.gender = Set(payload.gender);
    }
    active.updated_at = Set(now);

    let dress = active.update(db).await?;
    info!(tailor_id, dress_id, "Updated dress");
    Ok(dress)
}

/// Removes the dress with its images, orders and reviews. Returns the
/// stored names of the image files to remove from disk.
pub async fn delete_dress<C: ConnectionTrait>(
    db: &C,
    tailor_id: i32,
    dress_id: i32,
) -> Result<Vec<String>, ServiceError> {
    let dress = own_dress(db, tailor_id, dress_id).await?;
    let files = image::Entity::find()
        .filter(image::Column::PreDesignedId.eq(dress.id))
        .all(db)
        .await?
        .iter()
        .map(image::Model::stored_name)
        .collect();

    pre_designed::Entity::delete_by_id(dress.id).exec(db).await?;
    info!(tailor_id, dress_id, "Deleted dress");
    Ok(files)
}

pub async fn own_dresses<C: ConnectionTrait>(
    db: &C,
    tailor_id: i32,
) -> Result<Vec<DressView>, ServiceError> {
    let dresses = pre_designed::Entity::find()
        .filter(pre_designed::Column::TailorId.eq(tailor_id))
        .order_by_desc(pre_designed::Column::CreatedAt)
        .all(db)
        .await?;
    with_images(db, dresses).await
}

async fn with_images<C: ConnectionTrait>(
    db: &C,
    dresses: Vec<pre_designed::Model>,
) -> Result<Vec<DressView>, ServiceError> {
    let dress_ids: Vec<i32> = dresses.iter().map(|d| d.id).collect();
    let mut images: HashMap<i32, Vec<i32>> = HashMap::new();
    for img in image::Entity::find()
        .filter(image::Column::PreDesignedId.is_in(dress_ids))
        .order_by_asc(image::Column::Id)
        .all(db)
        .await?
    {
        images.entry(img.pre_designed_id).or_default().push(img.id);
    }

    let tailor_ids: Vec<i32> = dresses.iter().map(|d| d.tailor_id).collect();
    let names: HashMap<i32, String> = tailor::Entity::find()
        .filter(tailor::Column::Id.is_in(tailor_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|t| (t.id, t.business_name))
        .collect();

    Ok(dresses
        .into_iter()
        .map(|dress| DressView {
            image_ids: images.remove(&dress.id).unwrap_or_default(),
            tailor_name: names.get(&dress.tailor_id).cloned(),
            dress,
        })
        .collect())
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DressQuery {
    pub category: Option<DressCategory>,
    pub gender: Option<Gender>,
    pub tailor_id: Option<i32>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    /// Matches the title.
    pub query: Option<String>,
}

pub async fn list_dresses<C: ConnectionTrait>(
    db: &C,
    params: DressQuery,
) -> Result<Vec<DressView>, ServiceError> {
    let mut condition = Condition::all();

    if let Some(category) = params.category {
        condition = condition.add(pre_designed::Column::Category.eq(category));
    }
    if let Some(gender) = params.gender {
        condition = condition.add(pre_designed::Column::Gender.eq(gender));
    }
    if let Some(tailor_id) = params.tailor_id {
        condition = condition.add(pre_designed::Column::TailorId.eq(tailor_id));
    }
    if let Some(min_price) = params.min_price {
        condition = condition.add(pre_designed::Column::Price.gte(min_price));
    }
    if let Some(max_price) = params.max_price {
        condition = condition.add(pre_designed::Column::Price.lte(max_price));
    }
    if let Some(query) = non_blank(params.query) {
        condition = condition.add(pre_designed::Column::Title.contains(query));
    }

    let dresses = pre_designed::Entity::find()
        .filter(condition)
        .order_by_desc(pre_designed::Column::CreatedAt)
        .all(db)
        .await?;
    with_images(db, dresses).await
}

pub async fn dress_detail<C: ConnectionTrait>(
    db: &C,
    dress_id: i32,
) -> Result<DressView, ServiceError> {
    let dress = pre_designed::Entity::find_by_id(dress_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Dress", dress_id))?;
    with_images(db, vec![dress])
        .await?
        .pop()
        .ok_or_else(|| ServiceError::not_found("Dress", dress_id))
}

// IMAGES

pub async fn add_image<C: ConnectionTrait>(
    db: &C,
    tailor_id: i32,
    dress_id: i32,
    file_name: String,
    extension: FileExtension,
) -> Result<image::Model, ServiceError> {
    let dress = own_dress(db, tailor_id, dress_id).await?;
    let img = image::ActiveModel {
        pre_designed_id: Set(dress.id),
        file_name: Set(file_name),
        path_name: Set(Uuid::new_v4().to_string()),
        extension: Set(extension),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(tailor_id, dress_id, image_id = img.id, "Added image");
    Ok(img)
}

/// Deletes the row of one of the tailor's images and hands it back so the
/// caller can remove the file.
pub async fn delete_image<C: ConnectionTrait>(
    db: &C,
    tailor_id: i32,
    image_id: i32,
) -> Result<image::Model, ServiceError> {
    let (img, dress) = image::Entity::find_by_id(image_id)
        .find_also_related(pre_designed::Entity)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Image", image_id))?;
    if dress.map(|d| d.tailor_id) != Some(tailor_id) {
        return Err(ServiceError::not_found("Image", image_id));
    }

    image::Entity::delete_by_id(img.id).exec(db).await?;
    info!(tailor_id, image_id, "Deleted image");
    Ok(img)
}

pub async fn find_image<C: ConnectionTrait>(
    db: &C,
    image_id: i32,
) -> Result<image::Model, ServiceError> {
    image::Entity::find_by_id(image_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Image not found with {image_id} id")))
}

// EMBROIDERY

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct NewEmbroidery {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
    pub fabric_type: Option<String>,
    pub thread_type: Option<String>,
    pub color: Option<String>,
    #[serde(default)]
    pub complexity_level: Complexity,
    pub price: Decimal,
    #[validate(range(min = 0))]
    pub estimated_hours: Option<i32>,
}

#[derive(Clone, Debug, Default, Deserialize, Validate)]
pub struct PatchEmbroidery {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub fabric_type: Option<String>,
    pub thread_type: Option<String>,
    pub color: Option<String>,
    pub complexity_level: Option<Complexity>,
    pub price: Option<Decimal>,
    #[validate(range(min = 0))]
    pub estimated_hours: Option<i32>,
}

async fn own_embroidery<C: ConnectionTrait>(
    db: &C,
    tailor_id: i32,
    embroidery_id: i32,
) -> Result<embroidery::Model, ServiceError> {
    embroidery::Entity::find_by_id(embroidery_id)
        .filter(embroidery::Column::TailorId.eq(tailor_id))
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Embroidery", embroidery_id))
}

pub async fn create_embroidery<C: ConnectionTrait>(
    db: &C,
    tailor_id: i32,
    payload: NewEmbroidery,
    now: DateTimeUtc,
) -> Result<embroidery::Model, ServiceError> {
    payload.validate()?;
    let created = embroidery::ActiveModel {
        tailor_id: Set(tailor_id),
        title: Set(require(&payload.title, "title")?),
        description: Set(non_blank(payload.description)),
        fabric_type: Set(non_blank(payload.fabric_type)),
        thread_type: Set(non_blank(payload.thread_type)),
        color: Set(non_blank(payload.color)),
        complexity_level: Set(payload.complexity_level),
        price: Set(non_negative(payload.price, "price")?),
        estimated_hours: Set(payload.estimated_hours),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(tailor_id, embroidery_id = created.id, "Created embroidery");
    Ok(created)
}

/// A new price only affects custom orders placed afterwards.
pub async fn update_embroidery<C: ConnectionTrait>(
    db: &C,
    tailor_id: i32,
    embroidery_id: i32,
    payload: PatchEmbroidery,
    now: DateTimeUtc,
) -> Result<embroidery::Model, ServiceError> {
    payload.validate()?;
    let mut active: embroidery::ActiveModel =
        own_embroidery(db, tailor_id, embroidery_id).await?.into();

    if let Some(title) = payload.title {
        active.title = Set(require(&title, "title")?);
    }
    if let Some(description) = payload.description {
        active.description = Set(non_blank(Some(description)));
    }
    if let Some(fabric_type) = payload.fabric_type {
        active.fabric_type = Set(non_blank(Some(fabric_type)));
    }
    if let Some(thread_type) = payload.thread_type {
        active.thread_type = Set(non_blank(Some(thread_type)));
    }
    if let Some(color) = payload.color {
        active.color = Set(non_blank(Some(color)));
    }
    if let Some(complexity) = payload.complexity_level {
        active.complexity_level = Set(complexity);
    }
    if let Some(price) = payload.price {
        active.price = Set(non_negative(price, "price")?);
    }
    if payload.estimated_hours.is_some() {
        active.estimated_hours = Set(payload.estimated_hours);
    }
    active.updated_at = Set(now);

    let updated = active.update(db).await?;
    info!(tailor_id, embroidery_id, "Updated embroidery");
    Ok(updated)
}

/// Custom orders that used this embroidery keep their price and lose the
/// reference.
pub async fn delete_embroidery<C: ConnectionTrait>(
    db: &C,
    tailor_id: i32,
    embroidery_id: i32,
) -> Result<(), ServiceError> {
    let existing = own_embroidery(db, tailor_id, embroidery_id).await?;
    embroidery::Entity::delete_by_id(existing.id).exec(db).await?;
    info!(tailor_id, embroidery_id, "Deleted embroidery");
    Ok(())
}

pub async fn embroideries_of<C: ConnectionTrait>(
    db: &C,
    tailor_id: i32,
) -> Result<Vec<embroidery::Model>, ServiceError> {
    Ok(embroidery::Entity::find()
        .filter(embroidery::Column::TailorId.eq(tailor_id))
        .order_by_desc(embroidery::Column::CreatedAt)
        .all(db)
        .await?)
}

// FABRICS

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct NewFabric {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub fabric_type: FabricType,
    pub color: Option<String>,
    #[serde(default)]
    pub pattern: Pattern,
    pub texture: Option<String>,
    pub width: Decimal,
    pub length_available: Decimal,
    pub price_per_meter: Decimal,
    pub is_available: Option<bool>,
}

#[derive(Clone, Debug, Default, Deserialize, Validate)]
pub struct PatchFabric {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub fabric_type: Option<FabricType>,
    pub color: Option<String>,
    pub pattern: Option<Pattern>,
    pub texture: Option<String>,
    pub width: Option<Decimal>,
    pub length_available: Option<Decimal>,
    pub price_per_meter: Option<Decimal>,
    pub is_available: Option<bool>,
}

async fn own_fabric<C: ConnectionTrait>(
    db: &C,
    tailor_id: i32,
    fabric_id: i32,
) -> Result<fabric::Model, ServiceError> {
    fabric::Entity::find_by_id(fabric_id)
        .filter(fabric::Column::TailorId.eq(tailor_id))
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Fabric", fabric_id))
}

pub async fn create_fabric<C: ConnectionTrait>(
    db: &C,
    tailor_id: i32,
    payload: NewFabric,
    now: DateTimeUtc,
) -> Result<fabric::Model, ServiceError> {
    payload.validate()?;
    let created = fabric::ActiveModel {
        tailor_id: Set(tailor_id),
        name: Set(require(&payload.name, "name")?),
        description: Set(non_blank(payload.description)),
        fabric_type: Set(payload.fabric_type),
        color: Set(non_blank(payload.color)),
        pattern: Set(payload.pattern),
        texture: Set(non_blank(payload.texture)),
        width: Set(positive(payload.width, "width")?),
        length_available: Set(non_negative(payload.length_available, "length_available")?),
        price_per_meter: Set(positive(payload.price_per_meter, "price_per_meter")?),
        is_available: Set(payload.is_available.unwrap_or(true)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(tailor_id, fabric_id = created.id, "Created fabric");
    Ok(created)
}

pub async fn update_fabric<C: ConnectionTrait>(
    db: &C,
    tailor_id: i32,
    fabric_id: i32,
    payload: PatchFabric,
    now: DateTimeUtc,
) -> Result<fabric::Model, ServiceError> {
    payload.validate()?;
    let mut active: fabric::ActiveModel = own_fabric(db, tailor_id, fabric_id).await?.into();

    if let Some(name) = payload.name {
        active.name = Set(require(&name, "name")?);
    }
    if let Some(description) = payload.description {
        active.description = Set(non_blank(Some(description)));
    }
    if let Some(fabric_type) = payload.fabric_type {
        active.fabric_type = Set(fabric_type);
    }
    if let Some(color) = payload.color {
        active.color = Set(non_blank(Some(color)));
    }
    if let Some(pattern) = payload.pattern {
        active.pattern = Set(pattern);
    }
    if let Some(texture) = payload.texture {
        active.texture = Set(non_blank(Some(texture)));
    }
    if let Some(width) = payload.width {
        active.width = Set(positive(width, "width")?);
    }
    if let Some(length) = payload.length_available {
        active.length_available = Set(non_negative(length, "length_available")?);
    }
    if let Some(price) = payload.price_per_meter {
        active.price_per_meter = Set(positive(price, "price_per_meter")?);
    }
    if let Some(is_available) = payload.is_available {
        active.is_available = Set(is_available);
    }
    active.updated_at = Set(now);

    let updated = active.update(db).await?;
    info!(tailor_id, fabric_id, "Updated fabric");
    Ok(updated)
}

pub async fn delete_fabric<C: ConnectionTrait>(
    db: &C,
    tailor_id: i32,
    fabric_id: i32,
) -> Result<(), ServiceError> {
    let existing = own_fabric(db, tailor_id, fabric_id).await?;
    fabric::Entity::delete_by_id(existing.id).exec(db).await?;
    info!(tailor_id, fabric_id, "Deleted fabric");
    Ok(())
}

/// Fabrics of a tailor. The public listing only shows what is in stock.
pub async fn fabrics_of<C: ConnectionTrait>(
    db: &C,
    tailor_id: i32,
    only_available: bool,
) -> Result<Vec<fabric::Model>, ServiceError> {
    let mut query = fabric::Entity::find().filter(fabric::Column::TailorId.eq(tailor_id));
    if only_available {
        query = query.filter(fabric::Column::IsAvailable.eq(true));
    }
    Ok(query
        .order_by_asc(fabric::Column::Name)
        .all(db)
        .await?)
}

// TAILORS

#[derive(Clone, Debug, Default, Deserialize)]
pub struct TailorQuery {
    pub category: Option<String>,
    /// Matches business name or location.
    pub query: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub only_available: Option<bool>,
}

#[derive(Clone, Debug, Serialize)]
pub struct TailorDetail {
    #[serde(flatten)]
    pub tailor: tailor::Model,
    pub full_name: Option<String>,
    pub dresses: u64,
    pub embroideries: u64,
    pub fabrics: u64,
    pub reviews: u64,
}

pub async fn search_tailors<C: ConnectionTrait>(
    db: &C,
    params: TailorQuery,
) -> Result<Vec<tailor::Model>, ServiceError> {
    let mut condition = Condition::all();

    if let Some(category) = non_blank(params.category) {
        condition = condition.add(tailor::Column::Category.eq(category));
    }
    if let Some(query) = non_blank(params.query) {
        condition = condition.add(
            Condition::any()
                .add(tailor::Column::BusinessName.contains(query.clone()))
                .add(tailor::Column::BusinessLocation.contains(query)),
        );
    }
    if let Some(min_price) = params.min_price {
        condition = condition.add(tailor::Column::Price.gte(min_price));
    }
    if let Some(max_price) = params.max_price {
        condition = condition.add(tailor::Column::Price.lte(max_price));
    }
    if params.only_available.unwrap_or(false) {
        condition = condition.add(tailor::Column::IsAvailable.eq(true));
    }

    Ok(tailor::Entity::find()
        .filter(condition)
        .order_by_desc(tailor::Column::AverageRating)
        .order_by_asc(tailor::Column::BusinessName)
        .all(db)
        .await?)
}

pub async fn tailor_detail<C: ConnectionTrait>(
    db: &C,
    tailor_id: i32,
) -> Result<TailorDetail, ServiceError> {
    let (tailor, owner) = tailor::Entity::find_by_id(tailor_id)
        .find_also_related(user::Entity)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Tailor", tailor_id))?;

    let dresses = pre_designed::Entity::find()
        .filter(pre_designed::Column::TailorId.eq(tailor.id))
        .count(db)
        .await?;
    let embroideries = embroidery::Entity::find()
        .filter(embroidery::Column::TailorId.eq(tailor.id))
        .count(db)
        .await?;
    let fabrics = fabric::Entity::find()
        .filter(fabric::Column::TailorId.eq(tailor.id))
        .count(db)
        .await?;
    let reviews = review::Entity::find()
        .filter(review::Column::TailorId.eq(tailor.id))
        .count(db)
        .await?;

    Ok(TailorDetail {
        tailor,
        full_name: owner.map(|u| u.full_name()),
        dresses,
        embroideries,
        fabrics,
        reviews,
    })
}

/// Public catalog lookups report a missing tailor instead of an empty list.
pub async fn ensure_tailor<C: ConnectionTrait>(db: &C, tailor_id: i32) -> Result<(), ServiceError> {
    tailor::Entity::find_by_id(tailor_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Tailor", tailor_id))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn prices_are_checked_and_rounded() {
        assert_eq!(
            positive(Decimal::from_str("12.346").unwrap(), "price"),
            Ok(Decimal::from_str("12.35").unwrap())
        );
        assert!(positive(Decimal::ZERO, "price").is_err());
        assert_eq!(non_negative(Decimal::ZERO, "price"), Ok(Decimal::ZERO));
        assert!(non_negative(Decimal::from(-1), "price").is_err());
    }
}
