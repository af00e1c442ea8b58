use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Fulfilled-order totals for a date window.
///
/// Revenue is order value plus delivery charge. The `sr_linked_*` fields are
/// restricted to orders whose customer registered with a valid SR code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub total_orders: i64,
    pub total_order_value: f64,
    pub total_delivery_charges: f64,
    pub total_revenue: f64,
    pub unique_customers: i64,
    pub unique_referral_codes: i64,
    /// Revenue per order
    pub avg_order_value: f64,
    /// Order value (without delivery) per order
    pub avg_order_total: f64,
    pub avg_delivery_charge: f64,
    pub active_days: i64,
    pub sr_linked_orders: i64,
    pub sr_linked_order_total: f64,
    pub sr_linked_delivery_charges: f64,
    pub sr_linked_revenue: f64,
    pub sr_linked_percentage: f64,
}

/// One calendar day of fulfilled orders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesTrendPoint {
    pub date: NaiveDate,
    pub total_orders: i64,
    pub total_order_value: f64,
    pub total_delivery_charges: f64,
    pub total_revenue: f64,
    pub unique_customers: i64,
    pub avg_order_value: f64,
    pub avg_order_total: f64,
    pub avg_delivery_charge: f64,
    pub sr_linked_orders: i64,
    pub sr_linked_order_total: f64,
    pub sr_linked_delivery_charges: f64,
    pub sr_linked_revenue: f64,
    pub day_name: String,
}
