//! Delivery date estimation.
//!
//! Custom garments are promised a fixed number of *working* days after the
//! order is placed; pre-designed garments ship after a flat number of
//! calendar days.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use std::str::FromStr;
use thiserror::Error;

pub const CUSTOM_ORDER_WORKING_DAYS: u32 = 21;
pub const DRESS_ORDER_LEAD_DAYS: u64 = 10;

#[derive(Debug, Error, PartialEq)]
pub enum CalendarError {
    #[error("Unknown weekday '{0}'")]
    UnknownWeekday(String),
    #[error("A calendar needs at least one working day")]
    NoWorkingDays,
}

/// Which weekdays the workshop is closed on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkingCalendar {
    non_working: Vec<Weekday>,
}

impl WorkingCalendar {
    pub fn new(non_working: Vec<Weekday>) -> Result<Self, CalendarError> {
        let mut days = non_working;
        days.sort_by_key(|d| d.num_days_from_monday());
        days.dedup();
        if days.len() >= 7 {
            return Err(CalendarError::NoWorkingDays);
        }
        Ok(Self { non_working: days })
    }

    pub fn non_working_days(&self) -> &[Weekday] {
        &self.non_working
    }

    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        !self.non_working.contains(&date.weekday())
    }

    /// Walks forward one calendar day at a time and counts only working
    /// days. The start date itself is never counted.
    pub fn add_working_days(&self, start: NaiveDate, working_days: u32) -> NaiveDate {
        let mut current = start;
        let mut counted = 0;
        while counted < working_days {
            current = match current.checked_add_days(Days::new(1)) {
                Some(next) => next,
                None => return current,
            };
            if self.is_working_day(current) {
                counted += 1;
            }
        }
        current
    }

    pub fn custom_order_delivery(&self, placed_on: NaiveDate) -> NaiveDate {
        self.add_working_days(placed_on, CUSTOM_ORDER_WORKING_DAYS)
    }
}

impl Default for WorkingCalendar {
    fn default() -> Self {
        Self {
            non_working: vec![Weekday::Sat, Weekday::Sun],
        }
    }
}

/// Parses a comma separated weekday list such as `Sat,Sun` or `friday`.
/// An empty string means a seven day week.
impl FromStr for WorkingCalendar {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let days = s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                Weekday::from_str(part).map_err(|_| CalendarError::UnknownWeekday(part.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        WorkingCalendar::new(days)
    }
}

pub fn dress_order_delivery(placed_on: NaiveDate) -> NaiveDate {
    placed_on
        .checked_add_days(Days::new(DRESS_ORDER_LEAD_DAYS))
        .unwrap_or(placed_on)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn twenty_one_working_days_from_monday_spans_29_days() {
        let calendar = WorkingCalendar::default();
        let monday = date(2024, 6, 3);
        assert_eq!(monday.weekday(), Weekday::Mon);

        let delivery = calendar.custom_order_delivery(monday);
        assert_eq!(delivery, date(2024, 7, 2));
        assert_eq!((delivery - monday).num_days(), 29);
    }

    #[test]
    fn start_on_weekend_counts_next_working_day_first() {
        let calendar = WorkingCalendar::default();
        let saturday = date(2024, 6, 8);

        assert_eq!(calendar.add_working_days(saturday, 1), date(2024, 6, 10));
        assert_eq!(calendar.add_working_days(date(2024, 6, 9), 1), date(2024, 6, 10));
    }

    #[test]
    fn same_input_gives_same_output() {
        let calendar = WorkingCalendar::default();
        let start = date(2024, 12, 20);
        assert_eq!(
            calendar.custom_order_delivery(start),
            calendar.custom_order_delivery(start)
        );
        assert!(calendar.is_working_day(calendar.custom_order_delivery(start)));
    }

    #[test]
    fn custom_weekend_is_respected() {
        let calendar: WorkingCalendar = "Fri,Sat".parse().unwrap();
        let thursday = date(2024, 6, 6);
        assert_eq!(calendar.add_working_days(thursday, 1), date(2024, 6, 9));
        assert!(!calendar.is_working_day(date(2024, 6, 7)));
        assert!(calendar.is_working_day(date(2024, 6, 9)));
    }

    #[test]
    fn zero_working_days_keeps_the_start() {
        let calendar = WorkingCalendar::default();
        assert_eq!(calendar.add_working_days(date(2024, 6, 8), 0), date(2024, 6, 8));
    }

    #[test]
    fn calendar_parsing_rejects_bad_input() {
        assert_eq!(
            "Sat,Someday".parse::<WorkingCalendar>(),
            Err(CalendarError::UnknownWeekday("Someday".to_string()))
        );
        assert_eq!(
            "Mon,Tue,Wed,Thu,Fri,Sat,Sun".parse::<WorkingCalendar>(),
            Err(CalendarError::NoWorkingDays)
        );
        assert!("".parse::<WorkingCalendar>().unwrap().non_working_days().is_empty());
        assert_eq!(
            "sun, sat, Sun".parse::<WorkingCalendar>().unwrap(),
            WorkingCalendar::default()
        );
    }

    #[test]
    fn dress_orders_ship_ten_calendar_days_later() {
        assert_eq!(dress_order_delivery(date(2024, 6, 28)), date(2024, 7, 8));
    }
}
