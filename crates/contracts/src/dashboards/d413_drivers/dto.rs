use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Delivery rollup for one driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverPerformance {
    pub rank: u32,
    pub id: i64,
    pub name: String,
    pub mobile: Option<String>,
    pub total_orders_assigned: i64,
    pub delivered_count: i64,
    pub out_for_delivery_count: i64,
    /// Delivered / assigned, percent with two decimals
    pub delivery_success_rate: f64,
    /// Mean minutes from "out for delivery" to "delivered"
    pub avg_delivery_time_minutes: f64,
    pub active_days: i64,
    pub avg_orders_per_day: f64,
}

/// Deliveries completed by one driver on one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverTrendPoint {
    pub date: NaiveDate,
    pub driver_id: i64,
    pub driver_name: String,
    pub delivered: i64,
}

/// Unknown values fall back to `Delivered`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DriverSortKey {
    #[default]
    Delivered,
    SuccessRate,
    /// Fastest first
    DeliveryTime,
    Assigned,
}

impl DriverSortKey {
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("successRate") => DriverSortKey::SuccessRate,
            Some("deliveryTime") => DriverSortKey::DeliveryTime,
            Some("assigned") => DriverSortKey::Assigned,
            _ => DriverSortKey::Delivered,
        }
    }
}
