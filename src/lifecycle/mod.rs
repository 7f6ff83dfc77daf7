//! Order lifecycle and pricing rules. Everything in here is pure; the
//! services feed it rows read inside the request transaction.

pub mod dashboard;
pub mod delivery;
pub mod milestones;
pub mod pricing;
pub mod transitions;

pub use delivery::WorkingCalendar;
pub use milestones::OrderKind;
pub use pricing::TotalPrice;
