use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Customer-service rollup for one agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsrPerformance {
    pub rank: u32,
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub total_interactions: i64,
    pub new_order_calls: i64,
    pub complaint_calls: i64,
    pub inquiry_calls: i64,
    pub successful_orders: i64,
    pub successful_registrations: i64,
    pub complaints_resolved: i64,
    pub total_order_value: f64,
    /// Seconds
    pub avg_call_duration: f64,
    /// Successful outcomes / interactions, percent with two decimals
    pub success_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsrTrendPoint {
    pub date: NaiveDate,
    pub csr_id: i64,
    pub csr_name: String,
    pub interactions: i64,
}

/// Unknown values fall back to `Interactions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CsrSortKey {
    #[default]
    Interactions,
    SuccessRate,
    Orders,
    OrderValue,
}

impl CsrSortKey {
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("successRate") => CsrSortKey::SuccessRate,
            Some("orders") => CsrSortKey::Orders,
            Some("orderValue") => CsrSortKey::OrderValue,
            _ => CsrSortKey::Interactions,
        }
    }
}
