use crate::entities::order_status::OrderStatus;
use crate::error::ServiceError;

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Canceled)
    }

    /// `pending -> processing -> shipped -> delivered`, and `canceled` from
    /// any state that is not terminal. Staying put is always allowed.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;

        match (*self, next) {
            (from, to) if from == to => true,
            (Pending, Processing) | (Processing, Shipped) | (Shipped, Delivered) => true,
            (from, Canceled) => !from.is_terminal(),
            _ => false,
        }
    }
}

/// Parses a requested status; anything outside the enum is an invalid
/// transition rather than a plain validation error.
pub fn parse_status(current: OrderStatus, requested: &str) -> Result<OrderStatus, ServiceError> {
    requested
        .parse::<OrderStatus>()
        .map_err(|_| ServiceError::InvalidTransition {
            from: current.to_string(),
            to: requested.to_string(),
        })
}

pub fn transition(current: OrderStatus, requested: &str) -> Result<OrderStatus, ServiceError> {
    let next = parse_status(current, requested)?;
    if current.can_transition_to(next) {
        Ok(next)
    } else {
        Err(ServiceError::InvalidTransition {
            from: current.to_string(),
            to: next.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use OrderStatus::*;

    #[test]
    fn happy_path_moves_forward_one_step_at_a_time() {
        assert_eq!(transition(Pending, "processing"), Ok(Processing));
        assert_eq!(transition(Processing, "shipped"), Ok(Shipped));
        assert_eq!(transition(Shipped, "delivered"), Ok(Delivered));
    }

    #[test]
    fn skipping_or_going_back_is_rejected() {
        assert!(transition(Pending, "shipped").is_err());
        assert!(transition(Pending, "delivered").is_err());
        assert!(transition(Shipped, "processing").is_err());
        assert!(transition(Processing, "pending").is_err());
    }

    #[test]
    fn cancel_only_from_open_states() {
        for from in [Pending, Processing, Shipped] {
            assert_eq!(transition(from, "canceled"), Ok(Canceled));
        }
        assert!(transition(Delivered, "canceled").is_err());
        assert!(transition(Canceled, "pending").is_err());
        assert!(transition(Delivered, "pending").is_err());
    }

    #[test]
    fn same_status_is_a_no_op() {
        assert_eq!(transition(Delivered, "delivered"), Ok(Delivered));
        assert_eq!(transition(Pending, "Pending"), Ok(Pending));
    }

    #[test]
    fn unknown_status_is_an_invalid_transition() {
        assert_eq!(
            transition(Pending, "lost"),
            Err(ServiceError::InvalidTransition {
                from: "pending".to_string(),
                to: "lost".to_string(),
            })
        );
    }
}
