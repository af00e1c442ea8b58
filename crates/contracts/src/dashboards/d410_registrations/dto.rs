use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::enums::SourceClass;

/// Platform-wide registration totals for a date window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationSummary {
    pub total_registrations: i64,
    pub unique_referral_codes: i64,
    /// Distinct calendar days with at least one registration
    pub active_days: i64,
    pub avg_registrations_per_day: f64,
    #[serde(rename = "validSRLinkedRegistrations")]
    pub valid_sr_linked_registrations: i64,
    pub direct_registrations: i64,
    /// Valid SR-linked share of the total, one decimal
    pub sr_linked_percentage: f64,
}

/// One calendar day of registrations, split by source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationTrendPoint {
    pub date: NaiveDate,
    pub total_registrations: i64,
    pub sr_linked_registrations: i64,
    pub direct_registrations: i64,
    /// English weekday name, e.g. "Sunday"
    pub day_name: String,
}

/// Registrations in one source bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationSource {
    /// Display label ("Valid SR", "No Referral Code", ...)
    pub source: String,
    pub kind: SourceClass,
    pub registrations: i64,
    /// Share of all registrations in the window, two decimals
    pub percentage: f64,
}
