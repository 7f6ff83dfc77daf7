//! Read-only projection merging both order kinds for dashboards.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::prelude::DateTimeUtc;
use serde::Serialize;

use super::milestones::{custom_timeline, dress_timeline, OrderKind};
use super::pricing::TotalPrice;
use crate::entities::{
    custom_order, dress_order, dress_order::Size, order_status::OrderStatus, pre_designed,
};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MilestoneEntry {
    pub name: &'static str,
    pub date: Option<NaiveDate>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NormalizedOrder {
    pub id: i32,
    pub order_id: String,
    pub kind: OrderKind,
    pub order_type: &'static str,
    pub garment: String,
    pub category: String,
    pub tailor_id: i32,
    pub tailor_name: Option<String>,
    pub order_date: DateTimeUtc,
    pub delivery_date: Option<NaiveDate>,
    pub status: OrderStatus,
    pub progress: &'static str,
    pub amount: Decimal,
    pub timeline: Vec<MilestoneEntry>,
    pub size: Option<Size>,
    pub quantity: Option<i32>,
}

fn progress_label(status: OrderStatus) -> &'static str {
    if status == OrderStatus::Delivered {
        "Completed"
    } else {
        "Pending"
    }
}

pub fn milestone_entries(
    names: &[&'static str],
    dates: Vec<Option<NaiveDate>>,
) -> Vec<MilestoneEntry> {
    names
        .iter()
        .zip(dates)
        .map(|(name, date)| MilestoneEntry { name: *name, date })
        .collect()
}

impl NormalizedOrder {
    pub fn from_custom(order: &custom_order::Model, tailor_name: Option<String>) -> Self {
        let kind = OrderKind::Custom;
        Self {
            id: order.id,
            order_id: kind.display_id(order.id),
            kind,
            order_type: "Custom Order",
            garment: order
                .detailed_description
                .clone()
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| "Custom Garment".to_string()),
            category: order
                .category
                .map(|c| c.label().to_string())
                .unwrap_or_else(|| "Custom".to_string()),
            tailor_id: order.tailor_id,
            tailor_name,
            order_date: order.order_date,
            delivery_date: order.delivery_date,
            status: order.status,
            progress: progress_label(order.status),
            amount: order.total_price(),
            timeline: milestone_entries(kind.milestones(), custom_timeline(order)),
            size: None,
            quantity: None,
        }
    }

    pub fn from_dress(
        order: &dress_order::Model,
        product: Option<&pre_designed::Model>,
        tailor_name: Option<String>,
    ) -> Self {
        let kind = OrderKind::Dress;
        Self {
            id: order.id,
            order_id: kind.display_id(order.id),
            kind,
            order_type: "Pre-designed",
            garment: product
                .map(|p| p.title.clone())
                .unwrap_or_else(|| "Pre-designed Garment".to_string()),
            category: order
                .category
                .map(|c| c.label().to_string())
                .unwrap_or_else(|| "Pre-designed".to_string()),
            tailor_id: order.tailor_id,
            tailor_name,
            order_date: order.order_date,
            delivery_date: order.delivery_date,
            status: order.status,
            progress: progress_label(order.status),
            amount: order.total_price(),
            timeline: milestone_entries(kind.milestones(), dress_timeline(order)),
            size: Some(order.size),
            quantity: Some(order.quantity),
        }
    }
}

/// Latest delivery first; orders without a delivery date go last.
pub fn sort_by_delivery_desc(orders: &mut [NormalizedOrder]) {
    orders.sort_by(|a, b| {
        b.delivery_date
            .cmp(&a.delivery_date)
            .then_with(|| b.order_date.cmp(&a.order_date))
    });
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct OrderStats {
    pub total_orders: usize,
    pub completed_orders: usize,
    pub pending_orders: usize,
}

impl OrderStats {
    pub fn from_orders(orders: &[NormalizedOrder]) -> Self {
        let completed_orders = orders
            .iter()
            .filter(|o| o.status == OrderStatus::Delivered)
            .count();
        Self {
            total_orders: orders.len(),
            completed_orders,
            pending_orders: orders.len() - completed_orders,
        }
    }
}

/// Money earned from delivered orders.
pub fn delivered_revenue(orders: &[NormalizedOrder]) -> Decimal {
    orders
        .iter()
        .filter(|o| o.status == OrderStatus::Delivered)
        .fold(Decimal::ZERO, |total, o| total.saturating_add(o.amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    fn order(id: i32, delivery: Option<NaiveDate>, status: OrderStatus) -> NormalizedOrder {
        NormalizedOrder {
            id,
            order_id: OrderKind::Custom.display_id(id),
            kind: OrderKind::Custom,
            order_type: "Custom Order",
            garment: "Custom Garment".to_string(),
            category: "Custom".to_string(),
            tailor_id: 1,
            tailor_name: None,
            order_date: Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap(),
            delivery_date: delivery,
            status,
            progress: progress_label(status),
            amount: Decimal::from(100 * id),
            timeline: Vec::new(),
            size: None,
            quantity: None,
        }
    }

    fn date(d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2024, 7, d)
    }

    #[test]
    fn newest_delivery_first_and_undated_last() {
        let mut orders = vec![
            order(1, date(3), OrderStatus::Pending),
            order(2, None, OrderStatus::Pending),
            order(3, date(20), OrderStatus::Pending),
        ];
        sort_by_delivery_desc(&mut orders);
        let ids: Vec<i32> = orders.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn stats_always_add_up() {
        let orders = vec![
            order(1, date(1), OrderStatus::Delivered),
            order(2, date(2), OrderStatus::Shipped),
            order(3, None, OrderStatus::Canceled),
            order(4, date(4), OrderStatus::Delivered),
        ];
        let stats = OrderStats::from_orders(&orders);
        assert_eq!(stats.total_orders, 4);
        assert_eq!(stats.completed_orders, 2);
        assert_eq!(stats.total_orders, stats.completed_orders + stats.pending_orders);
        assert_eq!(OrderStats::from_orders(&[]), OrderStats::default());
    }

    #[test]
    fn progress_follows_status() {
        assert_eq!(order(1, None, OrderStatus::Delivered).progress, "Completed");
        assert_eq!(order(1, None, OrderStatus::Shipped).progress, "Pending");
    }

    #[test]
    fn revenue_counts_delivered_only() {
        let orders = vec![
            order(1, None, OrderStatus::Delivered),
            order(2, None, OrderStatus::Processing),
            order(3, None, OrderStatus::Delivered),
        ];
        assert_eq!(delivered_revenue(&orders), Decimal::from(400));
    }
}
