use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::enums::OrderStatus;

/// One valid referrer with its rollup for the window.
///
/// Also the row type of the summary export, so it stays flat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SrRosterEntry {
    pub id: i64,
    pub name: String,
    pub referral_code: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub profile_image: Option<String>,
    pub join_date: Option<String>,
    pub total_customers_registered: i64,
    pub total_orders: i64,
    pub total_order_value: f64,
}

/// Daily activity of one referrer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SrDailyPoint {
    pub date: NaiveDate,
    pub registrations: i64,
    pub orders: i64,
    pub order_value: f64,
}

/// Referrer detail page: roster entry plus daily activity (most recent first)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SrProfile {
    #[serde(flatten)]
    pub entry: SrRosterEntry,
    pub daily_data: Vec<SrDailyPoint>,
}

/// Leaderboard row: roster fields plus rank and conversion rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SrLeaderboardEntry {
    pub rank: u32,
    pub id: i64,
    pub name: String,
    pub referral_code: String,
    pub profile_image: Option<String>,
    pub total_customers_registered: i64,
    pub total_orders: i64,
    pub total_order_value: f64,
    /// Orders per registered customer, percent with one decimal
    pub conversion_rate: f64,
}

/// Leaderboard ordering. Unknown values fall back to `Registrations`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SrSortKey {
    #[default]
    Registrations,
    Revenue,
    Orders,
    Conversion,
}

impl SrSortKey {
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("revenue") => SrSortKey::Revenue,
            Some("orders") => SrSortKey::Orders,
            Some("conversion") => SrSortKey::Conversion,
            _ => SrSortKey::Registrations,
        }
    }
}

/// Headline numbers for the SR dashboard (valid referrers only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SrDashboardSummary {
    pub total_registrations: i64,
    pub total_orders: i64,
    pub total_order_value: f64,
    #[serde(rename = "totalActiveSRs")]
    pub total_active_srs: i64,
    pub average_order_value: f64,
    pub conversion_rate: f64,
}

/// SR-linked activity per day, oldest first (chart order)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SrTrendPoint {
    pub date: NaiveDate,
    pub registrations: i64,
    pub orders: i64,
    pub revenue: f64,
}

/// Flat export row: referrer → customer → order.
///
/// Field names are the CSV headers, kept snake_case for existing spreadsheets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SrExportRow {
    pub sr_name: String,
    pub sr_code: String,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub registration_date: Option<NaiveDate>,
    pub order_id: Option<i64>,
    pub order_value: Option<f64>,
    pub order_date: Option<NaiveDate>,
    pub order_status: Option<OrderStatus>,
}

/// `?dateRange=..&format=csv|json&detail=detailed|summary`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportQuery {
    #[serde(default)]
    pub date_range: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportDetail {
    Detailed,
    Summary,
}

impl ExportQuery {
    pub fn export_format(&self) -> ExportFormat {
        match self.format.as_deref() {
            Some("json") => ExportFormat::Json,
            _ => ExportFormat::Csv,
        }
    }

    pub fn export_detail(&self) -> ExportDetail {
        match self.detail.as_deref() {
            Some("summary") => ExportDetail::Summary,
            _ => ExportDetail::Detailed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_key_fallback() {
        assert_eq!(SrSortKey::from_param(None), SrSortKey::Registrations);
        assert_eq!(SrSortKey::from_param(Some("revenue")), SrSortKey::Revenue);
        assert_eq!(SrSortKey::from_param(Some("bogus")), SrSortKey::Registrations);
    }

    #[test]
    fn test_summary_uses_legacy_field_names() {
        let summary = SrDashboardSummary {
            total_registrations: 4,
            total_orders: 1,
            total_order_value: 17.25,
            total_active_srs: 2,
            average_order_value: 17.25,
            conversion_rate: 25.0,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["totalActiveSRs"], 2);
        assert_eq!(json["averageOrderValue"], 17.25);
    }

    #[test]
    fn test_profile_flattens_entry() {
        let profile = SrProfile {
            entry: SrRosterEntry {
                id: 7,
                name: "Amina Yusuf".into(),
                referral_code: "AMY7".into(),
                phone: None,
                email: None,
                profile_image: None,
                join_date: None,
                total_customers_registered: 3,
                total_orders: 2,
                total_order_value: 40.5,
            },
            daily_data: vec![],
        };
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["referralCode"], "AMY7");
        assert!(json["dailyData"].as_array().unwrap().is_empty());
    }
}
