use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Packing-station rollup for one packer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackingPerformance {
    pub rank: u32,
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub total_orders_packed: i64,
    pub orders_shipped: i64,
    pub orders_delivered: i64,
    pub orders_returned: i64,
    /// Delivered / packed, percent with two decimals
    pub success_rate: f64,
    /// Mean minutes from "received" to "processed"
    pub avg_packing_time_minutes: f64,
    pub active_days: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackingTrendPoint {
    pub date: NaiveDate,
    pub packer_id: i64,
    pub packer_name: String,
    pub orders_packed: i64,
    pub orders_shipped: i64,
}

/// Unknown values fall back to `Packed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PackingSortKey {
    #[default]
    Packed,
    SuccessRate,
    /// Fastest first
    PackingTime,
    Returned,
}

impl PackingSortKey {
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("successRate") => PackingSortKey::SuccessRate,
            Some("packingTime") => PackingSortKey::PackingTime,
            Some("returned") => PackingSortKey::Returned,
            _ => PackingSortKey::Packed,
        }
    }
}
