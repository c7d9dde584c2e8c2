//! Order status vocabulary and the transition table
//!
//! The transition table is a pure function (`OrderStatus::next`). Every
//! mutation of an order goes through it; there is no other way to change
//! a status. Display labels are likewise pure functions of the stored
//! status, never derived from cross-entity reads.

use serde::{Deserialize, Serialize};

/// Where an order entered the system
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderSource {
    /// Created by staff in the warehouse UI
    #[default]
    Manual,
    /// Created by a customer through the storefront
    Storefront,
}

/// Order lifecycle status
///
/// `CreatedUnpaid` is the only initial state. `Completed`, `Expired` and
/// `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Placed, no payment, no stock held
    #[default]
    CreatedUnpaid,
    /// Stock held against a deadline
    Reserved,
    /// Payment confirmed, stock still held
    Paid,
    /// Waiting on an inbound delivery before handover
    AwaitingFulfillment,
    /// Ready for customer pickup
    Ready,
    /// Handed over
    Completed,
    /// Reservation deadline passed, stock released
    Expired,
    /// Voided by staff or customer, stock released
    Cancelled,
}

/// Events accepted by the state machine
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleEvent {
    /// Hold stock and start the reservation window
    Reserve,
    /// Record payment for a reserved order
    ConfirmPayment,
    /// Move a paid order into the fulfillment queue
    MarkAwaitingFulfillment,
    /// Stock arrived, order can be picked up
    MarkReady,
    /// Hand the order over
    Complete,
    /// Void the order
    Cancel,
    /// Force a reservation past its deadline out
    Expire,
}

impl OrderStatus {
    /// Transition table: target status for `event` from `self`, or `None`
    /// when the transition is not defined.
    pub fn next(self, event: LifecycleEvent) -> Option<OrderStatus> {
        use LifecycleEvent::*;
        use OrderStatus::*;
        match (self, event) {
            (CreatedUnpaid, Reserve) => Some(Reserved),
            (Reserved, ConfirmPayment) => Some(Paid),
            (Reserved, Expire) => Some(Expired),
            (Paid, MarkAwaitingFulfillment) => Some(AwaitingFulfillment),
            (AwaitingFulfillment, MarkReady) => Some(Ready),
            (Ready, Complete) => Some(Completed),
            (CreatedUnpaid | Reserved | Paid, Cancel) => Some(Cancelled),
            _ => None,
        }
    }

    /// Whether orders in this status count against available stock
    pub fn consumes_stock(self) -> bool {
        matches!(
            self,
            OrderStatus::Reserved
                | OrderStatus::Paid
                | OrderStatus::AwaitingFulfillment
                | OrderStatus::Ready
                | OrderStatus::Completed
        )
    }

    /// Whether no further transition is defined from this status
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            OrderStatus::Completed | OrderStatus::Expired | OrderStatus::Cancelled
        )
    }

    /// Human-readable label, a pure function of the stored status
    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::CreatedUnpaid => "Ordered, not paid",
            OrderStatus::Reserved => "Reserved",
            OrderStatus::Paid => "Paid",
            OrderStatus::AwaitingFulfillment => "Awaiting delivery",
            OrderStatus::Ready => "Ready for pickup",
            OrderStatus::Completed => "Completed",
            OrderStatus::Expired => "Reservation expired",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATUSES: [OrderStatus; 8] = [
        OrderStatus::CreatedUnpaid,
        OrderStatus::Reserved,
        OrderStatus::Paid,
        OrderStatus::AwaitingFulfillment,
        OrderStatus::Ready,
        OrderStatus::Completed,
        OrderStatus::Expired,
        OrderStatus::Cancelled,
    ];

    const ALL_EVENTS: [LifecycleEvent; 7] = [
        LifecycleEvent::Reserve,
        LifecycleEvent::ConfirmPayment,
        LifecycleEvent::MarkAwaitingFulfillment,
        LifecycleEvent::MarkReady,
        LifecycleEvent::Complete,
        LifecycleEvent::Cancel,
        LifecycleEvent::Expire,
    ];

    #[test]
    fn test_happy_path_chain() {
        let mut status = OrderStatus::CreatedUnpaid;
        for event in [
            LifecycleEvent::Reserve,
            LifecycleEvent::ConfirmPayment,
            LifecycleEvent::MarkAwaitingFulfillment,
            LifecycleEvent::MarkReady,
            LifecycleEvent::Complete,
        ] {
            status = status.next(event).expect("chain transition must exist");
        }
        assert_eq!(status, OrderStatus::Completed);
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        for status in ALL_STATUSES {
            if status.is_terminal() {
                for event in ALL_EVENTS {
                    assert_eq!(status.next(event), None, "{status:?} is terminal");
                }
            }
        }
    }

    #[test]
    fn test_cancel_only_before_fulfillment() {
        assert!(OrderStatus::CreatedUnpaid.next(LifecycleEvent::Cancel).is_some());
        assert!(OrderStatus::Reserved.next(LifecycleEvent::Cancel).is_some());
        assert!(OrderStatus::Paid.next(LifecycleEvent::Cancel).is_some());
        assert!(OrderStatus::AwaitingFulfillment.next(LifecycleEvent::Cancel).is_none());
        assert!(OrderStatus::Ready.next(LifecycleEvent::Cancel).is_none());
        assert!(OrderStatus::Completed.next(LifecycleEvent::Cancel).is_none());
    }

    #[test]
    fn test_expire_only_from_reserved() {
        for status in ALL_STATUSES {
            let expected = status == OrderStatus::Reserved;
            assert_eq!(status.next(LifecycleEvent::Expire).is_some(), expected);
        }
    }

    #[test]
    fn test_created_unpaid_holds_no_stock() {
        assert!(!OrderStatus::CreatedUnpaid.consumes_stock());
        assert!(!OrderStatus::Expired.consumes_stock());
        assert!(!OrderStatus::Cancelled.consumes_stock());
        assert!(OrderStatus::Reserved.consumes_stock());
        assert!(OrderStatus::Completed.consumes_stock());
    }

    #[test]
    fn test_status_serde_format() {
        let json = serde_json::to_string(&OrderStatus::AwaitingFulfillment).unwrap();
        assert_eq!(json, "\"AWAITING_FULFILLMENT\"");
        let back: OrderStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, OrderStatus::AwaitingFulfillment);
    }
}
