//! Progress dates a tailor records while working on an order.

use chrono::NaiveDate;
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::entities::{custom_order, dress_order};
use crate::error::ServiceError;

pub const CUSTOM_MILESTONES: [&str; 5] = [
    "measurements_confirmed",
    "fabric_selected",
    "cutting_started",
    "stitching_started",
    "deliver",
];

pub const DRESS_MILESTONES: [&str; 4] = [
    "order_confirmed",
    "production",
    "quality_check",
    "deliver",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderKind {
    Custom,
    Dress,
}

impl OrderKind {
    pub fn milestones(&self) -> &'static [&'static str] {
        match self {
            OrderKind::Custom => &CUSTOM_MILESTONES,
            OrderKind::Dress => &DRESS_MILESTONES,
        }
    }

    pub fn milestone_index(&self, name: &str) -> Result<usize, ServiceError> {
        self.milestones()
            .iter()
            .position(|m| *m == name)
            .ok_or_else(|| {
                ServiceError::Validation(format!(
                    "Unknown milestone '{name}' for {self} orders; expected one of {}",
                    self.milestones().join(", ")
                ))
            })
    }

    pub fn display_id(&self, id: i32) -> String {
        match self {
            OrderKind::Custom => format!("TORD-{id:03}"),
            OrderKind::Dress => format!("DORD-{id:03}"),
        }
    }
}

impl FromStr for OrderKind {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "custom" => Ok(OrderKind::Custom),
            "dress" => Ok(OrderKind::Dress),
            _ => Err(ServiceError::NotFound(format!("Unknown order kind '{s}'"))),
        }
    }
}

impl fmt::Display for OrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderKind::Custom => f.write_str("custom"),
            OrderKind::Dress => f.write_str("dress"),
        }
    }
}

/// Dates along a milestone sequence must never go backwards. Unset
/// milestones do not constrain anything.
pub fn check_monotonic(
    timeline: &[Option<NaiveDate>],
    index: usize,
    date: NaiveDate,
    names: &[&str],
) -> Result<(), ServiceError> {
    for (i, other) in timeline.iter().enumerate() {
        let Some(other) = other else { continue };
        if i < index && *other > date {
            return Err(ServiceError::Validation(format!(
                "{} ({date}) cannot be earlier than {} ({other})",
                names[index], names[i]
            )));
        }
        if i > index && *other < date {
            return Err(ServiceError::Validation(format!(
                "{} ({date}) cannot be later than {} ({other})",
                names[index], names[i]
            )));
        }
    }
    Ok(())
}

pub fn custom_timeline(order: &custom_order::Model) -> Vec<Option<NaiveDate>> {
    vec![
        order.measurements_confirmed,
        order.fabric_selected,
        order.cutting_started,
        order.stitching_started,
        order.deliver,
    ]
}

pub fn dress_timeline(order: &dress_order::Model) -> Vec<Option<NaiveDate>> {
    vec![
        order.order_confirmed,
        order.production,
        order.quality_check,
        order.deliver,
    ]
}

pub fn set_custom_milestone(
    active: &mut custom_order::ActiveModel,
    index: usize,
    date: Option<NaiveDate>,
) {
    match index {
        0 => active.measurements_confirmed = Set(date),
        1 => active.fabric_selected = Set(date),
        2 => active.cutting_started = Set(date),
        3 => active.stitching_started = Set(date),
        _ => active.deliver = Set(date),
    }
}

pub fn set_dress_milestone(
    active: &mut dress_order::ActiveModel,
    index: usize,
    date: Option<NaiveDate>,
) {
    match index {
        0 => active.order_confirmed = Set(date),
        1 => active.production = Set(date),
        2 => active.quality_check = Set(date),
        _ => active.deliver = Set(date),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    #[test]
    fn display_ids_are_zero_padded() {
        assert_eq!(OrderKind::Custom.display_id(1), "TORD-001");
        assert_eq!(OrderKind::Dress.display_id(42), "DORD-042");
        assert_eq!(OrderKind::Custom.display_id(1234), "TORD-1234");
    }

    #[test]
    fn milestone_lookup_is_per_kind() {
        assert_eq!(OrderKind::Custom.milestone_index("cutting_started"), Ok(2));
        assert_eq!(OrderKind::Dress.milestone_index("deliver"), Ok(3));
        assert!(OrderKind::Dress.milestone_index("cutting_started").is_err());
    }

    #[test]
    fn unset_milestones_do_not_constrain() {
        let timeline = vec![None, None, None, None, None];
        assert!(check_monotonic(&timeline, 2, date(6, 1), &CUSTOM_MILESTONES).is_ok());
    }

    #[test]
    fn dates_cannot_go_backwards() {
        let timeline = vec![Some(date(6, 1)), Some(date(6, 5)), None, Some(date(6, 20)), None];

        assert!(check_monotonic(&timeline, 2, date(6, 10), &CUSTOM_MILESTONES).is_ok());
        assert!(check_monotonic(&timeline, 2, date(6, 5), &CUSTOM_MILESTONES).is_ok());
        assert!(check_monotonic(&timeline, 2, date(6, 4), &CUSTOM_MILESTONES).is_err());
        assert!(check_monotonic(&timeline, 2, date(6, 21), &CUSTOM_MILESTONES).is_err());
        assert!(check_monotonic(&timeline, 4, date(6, 19), &CUSTOM_MILESTONES).is_err());
    }

    #[test]
    fn kind_parses_from_path_segment() {
        assert_eq!("custom".parse::<OrderKind>(), Ok(OrderKind::Custom));
        assert_eq!("dress".parse::<OrderKind>(), Ok(OrderKind::Dress));
        assert!("gift".parse::<OrderKind>().is_err());
    }
}
