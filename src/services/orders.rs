use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    prelude::DateTimeUtc, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait,
    PaginatorTrait, QueryFilter, Set,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;
use validator::Validate;

use super::accounts::Measurements;
use super::{non_blank, require};
use crate::entities::{
    custom_order::{self, GarmentCategory},
    customer, dress_order,
    dress_order::Size,
    embroidery, fabric, favorite_dress, favorite_tailor,
    order_status::OrderStatus,
    pre_designed, review, tailor, user,
};
use crate::error::ServiceError;
use crate::lifecycle::{
    dashboard::{
        delivered_revenue, milestone_entries, sort_by_delivery_desc, MilestoneEntry,
        NormalizedOrder, OrderStats,
    },
    delivery::dress_order_delivery,
    milestones::{
        check_monotonic, custom_timeline, dress_timeline, set_custom_milestone, set_dress_milestone,
    },
    pricing::{check_price_limit, dress_total, resolve_custom_price},
    transitions::transition,
    OrderKind, TotalPrice, WorkingCalendar,
};

#[derive(Clone, Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct NewCustomOrder {
    pub embroidery_id: Option<i32>,
    pub category: Option<GarmentCategory>,
    pub address: String,
    #[validate(length(max = 15))]
    pub contact_number: Option<String>,
    pub gender: Option<String>,
    /// Joined with ", " when stored.
    pub occasions: Vec<String>,
    pub garment_type: Option<String>,
    pub fabrics: Option<String>,
    pub color: Option<String>,
    pub inspiration: Option<String>,
    pub detailed_description: Option<String>,
    pub special_requests: Option<String>,
    /// Overrides the computed price when present and non-zero.
    pub price: Option<Decimal>,
    #[serde(flatten)]
    #[validate(nested)]
    pub measurements: Measurements,
}

#[derive(Clone, Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct NewDressOrder {
    pub tailor_id: i32,
    pub product_id: i32,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
    /// Defaults to the dress's current price.
    pub unit_price: Option<Decimal>,
    pub size: Size,
    pub full_name: String,
    pub address: String,
    #[validate(length(max = 15))]
    pub phone: String,
    pub special_instructions: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlacedOrder {
    pub order_id: i32,
    pub display_id: String,
    pub kind: OrderKind,
    pub total_price: Decimal,
    pub delivery_date: NaiveDate,
    pub status: OrderStatus,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StatusChange {
    pub order_id: i32,
    pub display_id: String,
    pub kind: OrderKind,
    pub from: OrderStatus,
    pub to: OrderStatus,
    pub deliver: Option<NaiveDate>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MilestoneChange {
    pub order_id: i32,
    pub display_id: String,
    pub kind: OrderKind,
    pub milestone: &'static str,
    pub date: Option<NaiveDate>,
    pub timeline: Vec<MilestoneEntry>,
}

pub async fn create_custom_order<C: ConnectionTrait>(
    db: &C,
    calendar: &WorkingCalendar,
    customer_id: i32,
    tailor_id: i32,
    form: NewCustomOrder,
    placed_at: DateTimeUtc,
) -> Result<PlacedOrder, ServiceError> {
    form.validate()?;
    let address = require(&form.address, "address")?;
    if form.price.is_some_and(|p| p < Decimal::ZERO) {
        return Err(ServiceError::Validation("price cannot be negative".to_string()));
    }

    let customer = customer::Entity::find_by_id(customer_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Customer", customer_id))?;
    let tailor = tailor::Entity::find_by_id(tailor_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Tailor", tailor_id))?;

    let embroidery = match form.embroidery_id {
        Some(id) => Some(
            embroidery::Entity::find_by_id(id)
                .filter(embroidery::Column::TailorId.eq(tailor.id))
                .one(db)
                .await?
                .ok_or_else(|| ServiceError::not_found("Embroidery", id))?,
        ),
        None => None,
    };

    let price = resolve_custom_price(
        Some(tailor.price),
        embroidery.as_ref().map(|e| e.price),
        form.price,
    )?;
    let delivery_date = calendar.custom_order_delivery(placed_at.date_naive());
    let measurements = form.measurements.or_profile(&customer);
    let occasions: Vec<String> = form
        .occasions
        .iter()
        .map(|o| o.trim())
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect();

    let order = custom_order::ActiveModel {
        customer_id: Set(customer.id),
        tailor_id: Set(tailor.id),
        embroidery_id: Set(embroidery.as_ref().map(|e| e.id)),
        category: Set(form.category),
        order_date: Set(placed_at),
        address: Set(address),
        contact_number: Set(non_blank(form.contact_number).or(customer.phone.clone())),
        gender: Set(non_blank(form.gender)),
        occasion: Set(non_blank(Some(occasions.join(", ")))),
        garment_type: Set(non_blank(form.garment_type)),
        fabrics: Set(non_blank(form.fabrics)),
        color: Set(non_blank(form.color)),
        inspiration: Set(non_blank(form.inspiration)),
        detailed_description: Set(non_blank(form.detailed_description)),
        special_requests: Set(non_blank(form.special_requests)),
        delivery_date: Set(Some(delivery_date)),
        price: Set(price),
        chest: Set(measurements.chest),
        waist: Set(measurements.waist),
        hip: Set(measurements.hip),
        shoulder: Set(measurements.shoulder),
        sleeve: Set(measurements.sleeve),
        neck: Set(measurements.neck),
        length: Set(measurements.length),
        inseam: Set(measurements.inseam),
        measurements_confirmed: Set(None),
        fabric_selected: Set(None),
        cutting_started: Set(None),
        stitching_started: Set(None),
        deliver: Set(None),
        status: Set(OrderStatus::Pending),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let kind = OrderKind::Custom;
    info!(
        order = %kind.display_id(order.id),
        customer_id = customer.id,
        tailor_id = tailor.id,
        price = %order.price,
        delivery_date = %delivery_date,
        "Placed custom order"
    );
    Ok(PlacedOrder {
        order_id: order.id,
        display_id: kind.display_id(order.id),
        kind,
        total_price: order.total_price(),
        delivery_date,
        status: order.status,
    })
}

pub async fn create_dress_order<C: ConnectionTrait>(
    db: &C,
    buyer_user_id: i32,
    form: NewDressOrder,
    placed_at: DateTimeUtc,
) -> Result<PlacedOrder, ServiceError> {
    form.validate()?;
    require(&form.full_name, "full_name")?;
    let address = require(&form.address, "address")?;
    let phone = require(&form.phone, "phone")?;
    if form.unit_price.is_some_and(|p| p <= Decimal::ZERO) {
        return Err(ServiceError::Validation("Invalid price".to_string()));
    }

    let buyer = user::Entity::find_by_id(buyer_user_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("User", buyer_user_id))?;
    let product = pre_designed::Entity::find_by_id(form.product_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Dress", form.product_id))?;
    let tailor = tailor::Entity::find_by_id(form.tailor_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Tailor", form.tailor_id))?;
    if product.tailor_id != tailor.id {
        return Err(ServiceError::Validation(format!(
            "Dress {} is not sold by tailor {}",
            product.id, tailor.id
        )));
    }

    let unit_price = form.unit_price.unwrap_or(product.price).round_dp(2);
    if unit_price <= Decimal::ZERO {
        return Err(ServiceError::Validation("Invalid price".to_string()));
    }
    let unit_price = check_price_limit(unit_price, "unit_price")?;
    let total_price = dress_total(form.quantity, unit_price)?;
    let delivery_date = dress_order_delivery(placed_at.date_naive());

    let order = dress_order::ActiveModel {
        user_id: Set(buyer.id),
        tailor_id: Set(tailor.id),
        product_id: Set(product.id),
        category: Set(product.category),
        quantity: Set(form.quantity),
        unit_price: Set(unit_price),
        order_date: Set(placed_at),
        delivery_date: Set(Some(delivery_date)),
        address: Set(address),
        contact_number: Set(phone),
        size: Set(form.size),
        special_instructions: Set(non_blank(form.special_instructions)),
        order_confirmed: Set(None),
        production: Set(None),
        quality_check: Set(None),
        deliver: Set(None),
        status: Set(OrderStatus::Pending),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let kind = OrderKind::Dress;
    info!(
        order = %kind.display_id(order.id),
        user_id = buyer.id,
        tailor_id = tailor.id,
        quantity = order.quantity,
        total = %total_price,
        "Placed dress order"
    );
    Ok(PlacedOrder {
        order_id: order.id,
        display_id: kind.display_id(order.id),
        kind,
        total_price,
        delivery_date,
        status: order.status,
    })
}

fn order_not_found(kind: OrderKind, order_id: i32) -> ServiceError {
    ServiceError::NotFound(format!("Order {} not found", kind.display_id(order_id)))
}

async fn custom_order_of<C: ConnectionTrait>(
    db: &C,
    tailor_id: i32,
    order_id: i32,
) -> Result<custom_order::Model, ServiceError> {
    custom_order::Entity::find_by_id(order_id)
        .filter(custom_order::Column::TailorId.eq(tailor_id))
        .one(db)
        .await?
        .ok_or_else(|| order_not_found(OrderKind::Custom, order_id))
}

async fn dress_order_of<C: ConnectionTrait>(
    db: &C,
    tailor_id: i32,
    order_id: i32,
) -> Result<dress_order::Model, ServiceError> {
    dress_order::Entity::find_by_id(order_id)
        .filter(dress_order::Column::TailorId.eq(tailor_id))
        .one(db)
        .await?
        .ok_or_else(|| order_not_found(OrderKind::Dress, order_id))
}

/// Stamp for the `deliver` milestone when an order is marked delivered. An
/// existing stamp is kept; otherwise today, pushed forward to the latest
/// earlier milestone so the timeline stays in order.
fn delivered_stamp(timeline: &[Option<NaiveDate>], today: NaiveDate) -> NaiveDate {
    if let Some(Some(existing)) = timeline.last() {
        return *existing;
    }
    timeline.iter().flatten().copied().fold(today, NaiveDate::max)
}

/// A delivered order always carries its `deliver` date.
fn check_not_clearing_deliver(
    status: OrderStatus,
    index: usize,
    names: &[&str],
    date: Option<NaiveDate>,
) -> Result<(), ServiceError> {
    if date.is_none() && index + 1 == names.len() && status == OrderStatus::Delivered {
        return Err(ServiceError::Validation(format!(
            "{} cannot be cleared on a delivered order",
            names[index]
        )));
    }
    Ok(())
}

async fn add_earning<C: ConnectionTrait>(
    db: &C,
    tailor_id: i32,
    amount: Decimal,
) -> Result<(), ServiceError> {
    let tailor = tailor::Entity::find_by_id(tailor_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Tailor", tailor_id))?;
    let total = tailor
        .total_earning
        .checked_add(amount)
        .ok_or_else(|| ServiceError::Validation("total earnings overflow".to_string()))?;
    let mut active: tailor::ActiveModel = tailor.into();
    active.total_earning = Set(total);
    active.update(db).await?;
    Ok(())
}

/// Moves an order of the calling tailor along the status table. Orders of
/// other tailors look missing.
pub async fn update_order_status<C: ConnectionTrait>(
    db: &C,
    tailor_id: i32,
    kind: OrderKind,
    order_id: i32,
    requested: &str,
    today: NaiveDate,
) -> Result<StatusChange, ServiceError> {
    let (from, to, deliver, amount) = match kind {
        OrderKind::Custom => {
            let order = custom_order_of(db, tailor_id, order_id).await?;
            let from = order.status;
            let to = transition(from, requested)?;
            if from == to {
                (from, to, order.deliver, Decimal::ZERO)
            } else {
                let amount = order.total_price();
                let deliver = match to {
                    OrderStatus::Delivered => {
                        Some(delivered_stamp(&custom_timeline(&order), today))
                    }
                    _ => order.deliver,
                };
                let mut active: custom_order::ActiveModel = order.into();
                active.status = Set(to);
                active.deliver = Set(deliver);
                active.update(db).await?;
                (from, to, deliver, amount)
            }
        }
        OrderKind::Dress => {
            let order = dress_order_of(db, tailor_id, order_id).await?;
            let from = order.status;
            let to = transition(from, requested)?;
            if from == to {
                (from, to, order.deliver, Decimal::ZERO)
            } else {
                let amount = order.total_price();
                let deliver = match to {
                    OrderStatus::Delivered => {
                        Some(delivered_stamp(&dress_timeline(&order), today))
                    }
                    _ => order.deliver,
                };
                let mut active: dress_order::ActiveModel = order.into();
                active.status = Set(to);
                active.deliver = Set(deliver);
                active.update(db).await?;
                (from, to, deliver, amount)
            }
        }
    };

    if from != to {
        if to == OrderStatus::Delivered {
            add_earning(db, tailor_id, amount).await?;
        }
        info!(
            order = %kind.display_id(order_id),
            tailor_id,
            from = %from,
            to = %to,
            "Changed order status"
        );
    }

    Ok(StatusChange {
        order_id,
        display_id: kind.display_id(order_id),
        kind,
        from,
        to,
        deliver,
    })
}

/// Sets or clears one milestone date. Never touches the status.
pub async fn update_milestone_date<C: ConnectionTrait>(
    db: &C,
    tailor_id: i32,
    kind: OrderKind,
    order_id: i32,
    milestone: &str,
    date: Option<NaiveDate>,
) -> Result<MilestoneChange, ServiceError> {
    let index = kind.milestone_index(milestone)?;
    let names = kind.milestones();

    let timeline = match kind {
        OrderKind::Custom => {
            let order = custom_order_of(db, tailor_id, order_id).await?;
            check_not_clearing_deliver(order.status, index, names, date)?;
            if let Some(date) = date {
                check_monotonic(&custom_timeline(&order), index, date, names)?;
            }
            let mut active: custom_order::ActiveModel = order.into();
            set_custom_milestone(&mut active, index, date);
            custom_timeline(&active.update(db).await?)
        }
        OrderKind::Dress => {
            let order = dress_order_of(db, tailor_id, order_id).await?;
            check_not_clearing_deliver(order.status, index, names, date)?;
            if let Some(date) = date {
                check_monotonic(&dress_timeline(&order), index, date, names)?;
            }
            let mut active: dress_order::ActiveModel = order.into();
            set_dress_milestone(&mut active, index, date);
            dress_timeline(&active.update(db).await?)
        }
    };

    info!(
        order = %kind.display_id(order_id),
        tailor_id,
        milestone = names[index],
        date = ?date,
        "Updated milestone"
    );
    Ok(MilestoneChange {
        order_id,
        display_id: kind.display_id(order_id),
        kind,
        milestone: names[index],
        date,
        timeline: milestone_entries(names, timeline),
    })
}

async fn tailor_names<C: ConnectionTrait>(
    db: &C,
    ids: Vec<i32>,
) -> Result<HashMap<i32, String>, ServiceError> {
    Ok(tailor::Entity::find()
        .filter(tailor::Column::Id.is_in(ids))
        .all(db)
        .await?
        .into_iter()
        .map(|t| (t.id, t.business_name))
        .collect())
}

async fn dress_products<C: ConnectionTrait>(
    db: &C,
    orders: &[dress_order::Model],
) -> Result<HashMap<i32, pre_designed::Model>, ServiceError> {
    let ids: Vec<i32> = orders.iter().map(|o| o.product_id).collect();
    Ok(pre_designed::Entity::find()
        .filter(pre_designed::Column::Id.is_in(ids))
        .all(db)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect())
}

async fn normalize<C: ConnectionTrait>(
    db: &C,
    custom: Vec<custom_order::Model>,
    dress: Vec<dress_order::Model>,
) -> Result<Vec<NormalizedOrder>, ServiceError> {
    let tailor_ids: Vec<i32> = custom
        .iter()
        .map(|o| o.tailor_id)
        .chain(dress.iter().map(|o| o.tailor_id))
        .collect();
    let names = tailor_names(db, tailor_ids).await?;
    let products = dress_products(db, &dress).await?;

    let mut orders: Vec<NormalizedOrder> = custom
        .iter()
        .map(|o| NormalizedOrder::from_custom(o, names.get(&o.tailor_id).cloned()))
        .chain(dress.iter().map(|o| {
            NormalizedOrder::from_dress(
                o,
                products.get(&o.product_id),
                names.get(&o.tailor_id).cloned(),
            )
        }))
        .collect();
    sort_by_delivery_desc(&mut orders);
    Ok(orders)
}

/// Both kinds of order a customer placed, newest delivery first.
pub async fn list_orders_for_customer<C: ConnectionTrait>(
    db: &C,
    customer_id: i32,
) -> Result<Vec<NormalizedOrder>, ServiceError> {
    let customer = customer::Entity::find_by_id(customer_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Customer", customer_id))?;

    let custom = custom_order::Entity::find()
        .filter(custom_order::Column::CustomerId.eq(customer.id))
        .all(db)
        .await?;
    let dress = dress_order::Entity::find()
        .filter(dress_order::Column::UserId.eq(customer.user_id))
        .all(db)
        .await?;

    normalize(db, custom, dress).await
}

pub async fn list_orders_for_tailor<C: ConnectionTrait>(
    db: &C,
    tailor_id: i32,
) -> Result<Vec<NormalizedOrder>, ServiceError> {
    let custom = custom_order::Entity::find()
        .filter(custom_order::Column::TailorId.eq(tailor_id))
        .all(db)
        .await?;
    let dress = dress_order::Entity::find()
        .filter(dress_order::Column::TailorId.eq(tailor_id))
        .all(db)
        .await?;

    normalize(db, custom, dress).await
}

#[derive(Clone, Debug, Serialize)]
pub struct CustomerDashboard {
    pub customer_id: i32,
    pub orders: Vec<NormalizedOrder>,
    #[serde(flatten)]
    pub stats: OrderStats,
    pub favorite_tailors: u64,
    pub favorite_dresses: u64,
}

pub async fn customer_dashboard<C: ConnectionTrait>(
    db: &C,
    customer_id: i32,
) -> Result<CustomerDashboard, ServiceError> {
    let orders = list_orders_for_customer(db, customer_id).await?;
    let favorite_tailors = favorite_tailor::Entity::find()
        .filter(favorite_tailor::Column::CustomerId.eq(customer_id))
        .count(db)
        .await?;
    let favorite_dresses = favorite_dress::Entity::find()
        .filter(favorite_dress::Column::CustomerId.eq(customer_id))
        .count(db)
        .await?;

    Ok(CustomerDashboard {
        customer_id,
        stats: OrderStats::from_orders(&orders),
        orders,
        favorite_tailors,
        favorite_dresses,
    })
}

#[derive(Clone, Debug, Serialize)]
pub struct TailorDashboard {
    pub tailor_id: i32,
    pub business_name: String,
    pub orders: Vec<NormalizedOrder>,
    #[serde(flatten)]
    pub stats: OrderStats,
    pub dresses: u64,
    pub embroideries: u64,
    pub fabrics: u64,
    pub reviews: u64,
    pub average_rating: f64,
    pub earnings: Decimal,
}

pub async fn tailor_dashboard<C: ConnectionTrait>(
    db: &C,
    tailor_id: i32,
) -> Result<TailorDashboard, ServiceError> {
    let tailor = tailor::Entity::find_by_id(tailor_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Tailor", tailor_id))?;
    let orders = list_orders_for_tailor(db, tailor.id).await?;

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

    Ok(TailorDashboard {
        tailor_id: tailor.id,
        business_name: tailor.business_name,
        stats: OrderStats::from_orders(&orders),
        earnings: delivered_revenue(&orders),
        orders,
        dresses,
        embroideries,
        fabrics,
        reviews,
        average_rating: tailor.average_rating,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn delivered_stamp_fills_only_an_empty_deliver() {
        let open = vec![Some(date(1)), None, None, None];
        assert_eq!(delivered_stamp(&open, date(10)), date(10));

        let stamped = vec![Some(date(1)), None, None, Some(date(5))];
        assert_eq!(delivered_stamp(&stamped, date(10)), date(5));
    }

    #[test]
    fn delivered_stamp_never_breaks_the_timeline() {
        let names = OrderKind::Dress.milestones();
        let future = vec![Some(date(1)), Some(date(20)), None, None];
        let stamp = delivered_stamp(&future, date(10));
        assert_eq!(stamp, date(20));
        assert!(check_monotonic(&future, 3, stamp, names).is_ok());
    }

    #[test]
    fn deliver_stays_set_on_delivered_orders() {
        let names = OrderKind::Custom.milestones();
        assert!(check_not_clearing_deliver(OrderStatus::Delivered, 4, names, None).is_err());
        assert!(check_not_clearing_deliver(OrderStatus::Delivered, 3, names, None).is_ok());
        assert!(check_not_clearing_deliver(OrderStatus::Shipped, 4, names, None).is_ok());
        assert!(
            check_not_clearing_deliver(OrderStatus::Delivered, 4, names, Some(date(9))).is_ok()
        );
    }
}
