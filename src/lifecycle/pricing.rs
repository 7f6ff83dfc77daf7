use rust_decimal::Decimal;

use crate::entities::{custom_order, dress_order};
use crate::error::ServiceError;

/// Largest amount a `Decimal(10, 2)` price column holds: 99,999,999.99.
pub const MAX_PRICE: Decimal = Decimal::from_parts(0x540B_E3FF, 2, 0, false, 2);

/// Rejects amounts the price columns cannot hold.
pub fn check_price_limit(value: Decimal, field: &str) -> Result<Decimal, ServiceError> {
    if value > MAX_PRICE {
        return Err(ServiceError::Validation(format!(
            "{field} cannot exceed {MAX_PRICE}"
        )));
    }
    Ok(value)
}

/// A caller supplied, non-zero price always wins. Otherwise the order costs
/// the tailor's base price plus the chosen embroidery; whatever is missing
/// counts as zero.
pub fn resolve_custom_price(
    base_price: Option<Decimal>,
    embroidery_price: Option<Decimal>,
    explicit: Option<Decimal>,
) -> Result<Decimal, ServiceError> {
    if let Some(price) = explicit.filter(|p| !p.is_zero()) {
        return check_price_limit(price.round_dp(2), "price");
    }
    let total = base_price
        .unwrap_or_default()
        .checked_add(embroidery_price.unwrap_or_default())
        .ok_or_else(|| ServiceError::Validation("price is too large".to_string()))?;
    check_price_limit(total.round_dp(2), "price")
}

pub fn dress_total(quantity: i32, unit_price: Decimal) -> Result<Decimal, ServiceError> {
    Decimal::from(quantity)
        .checked_mul(unit_price)
        .map(|total| total.round_dp(2))
        .ok_or_else(|| ServiceError::Validation("order total is too large".to_string()))
}

/// What the customer owes for an order.
pub trait TotalPrice {
    fn total_price(&self) -> Decimal;
}

impl TotalPrice for custom_order::Model {
    fn total_price(&self) -> Decimal {
        self.price
    }
}

/// Stored rows went through `dress_total` when placed, so saturation only
/// guards rows written by other means.
impl TotalPrice for dress_order::Model {
    fn total_price(&self) -> Decimal {
        Decimal::from(self.quantity)
            .saturating_mul(self.unit_price)
            .round_dp(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn base_plus_embroidery_when_no_override() {
        assert_eq!(
            resolve_custom_price(Some(dec("500")), Some(dec("150.50")), None),
            Ok(dec("650.50"))
        );
    }

    #[test]
    fn missing_parts_count_as_zero() {
        assert_eq!(resolve_custom_price(Some(dec("500")), None, None), Ok(dec("500")));
        assert_eq!(resolve_custom_price(None, Some(dec("80")), None), Ok(dec("80")));
        assert_eq!(resolve_custom_price(None, None, None), Ok(Decimal::ZERO));
    }

    #[test]
    fn explicit_price_overrides_unless_zero() {
        assert_eq!(
            resolve_custom_price(Some(dec("500")), Some(dec("100")), Some(dec("999.99"))),
            Ok(dec("999.99"))
        );
        assert_eq!(
            resolve_custom_price(Some(dec("500")), Some(dec("100")), Some(Decimal::ZERO)),
            Ok(dec("600"))
        );
    }

    #[test]
    fn dress_total_multiplies() {
        assert_eq!(dress_total(3, dec("200")), Ok(dec("600")));
        assert_eq!(dress_total(1, dec("149.99")), Ok(dec("149.99")));
        assert_eq!(dress_total(4, dec("12.25")), Ok(dec("49.00")));
    }

    #[test]
    fn price_limit_matches_the_column() {
        assert_eq!(MAX_PRICE, dec("99999999.99"));
        assert!(check_price_limit(dec("99999999.99"), "price").is_ok());
        assert!(matches!(
            check_price_limit(dec("100000000"), "price"),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn oversized_amounts_are_errors_not_panics() {
        assert!(matches!(
            dress_total(1000, Decimal::MAX),
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            resolve_custom_price(Some(Decimal::MAX), Some(Decimal::MAX), None),
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            resolve_custom_price(Some(dec("60000000")), Some(dec("60000000")), None),
            Err(ServiceError::Validation(_))
        ));
    }
}
