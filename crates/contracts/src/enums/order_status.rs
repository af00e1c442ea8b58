use serde::{Deserialize, Serialize};

/// Order lifecycle state as stored in `orders.active_status` / `order_statuses.status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    AwaitingPayment,
    Received,
    Processed,
    Shipped,
    OutForDelivery,
    Delivered,
    Cancelled,
    Returned,
}

impl OrderStatus {
    /// Store code of the status
    pub fn code(&self) -> &'static str {
        match self {
            OrderStatus::AwaitingPayment => "1",
            OrderStatus::Received => "2",
            OrderStatus::Processed => "3",
            OrderStatus::Shipped => "4",
            OrderStatus::OutForDelivery => "5",
            OrderStatus::Delivered => "6",
            OrderStatus::Cancelled => "7",
            OrderStatus::Returned => "8",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OrderStatus::AwaitingPayment => "Awaiting payment",
            OrderStatus::Received => "Received",
            OrderStatus::Processed => "Processed",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::OutForDelivery => "Out for delivery",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
            OrderStatus::Returned => "Returned",
        }
    }

    pub fn all() -> Vec<OrderStatus> {
        vec![
            OrderStatus::AwaitingPayment,
            OrderStatus::Received,
            OrderStatus::Processed,
            OrderStatus::Shipped,
            OrderStatus::OutForDelivery,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
            OrderStatus::Returned,
        ]
    }

    /// Statuses that count toward sales: confirmed through delivered
    pub fn fulfilled() -> Vec<OrderStatus> {
        Self::all()
            .into_iter()
            .filter(|s| s.is_fulfilled())
            .collect()
    }

    pub fn is_fulfilled(&self) -> bool {
        matches!(
            self,
            OrderStatus::Received
                | OrderStatus::Processed
                | OrderStatus::Shipped
                | OrderStatus::OutForDelivery
                | OrderStatus::Delivered
        )
    }

    /// Statuses reached after the order left the packing station.
    /// Returns count: a returned parcel was shipped first.
    pub fn is_shipped_or_later(&self) -> bool {
        matches!(
            self,
            OrderStatus::Shipped
                | OrderStatus::OutForDelivery
                | OrderStatus::Delivered
                | OrderStatus::Returned
        )
    }

    pub fn shipped_or_later() -> Vec<OrderStatus> {
        Self::all()
            .into_iter()
            .filter(|s| s.is_shipped_or_later())
            .collect()
    }

    /// Parse a store code. Numeric codes may arrive as `"6"` or `6`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "1" => Some(OrderStatus::AwaitingPayment),
            "2" => Some(OrderStatus::Received),
            "3" => Some(OrderStatus::Processed),
            "4" => Some(OrderStatus::Shipped),
            "5" => Some(OrderStatus::OutForDelivery),
            "6" => Some(OrderStatus::Delivered),
            "7" => Some(OrderStatus::Cancelled),
            "8" => Some(OrderStatus::Returned),
            _ => None,
        }
    }
}
