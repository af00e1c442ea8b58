use serde::{Deserialize, Serialize};

/// `marketing_persons.status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferrerStatus {
    Active,
    Inactive,
}

impl ReferrerStatus {
    /// Only the exact active sentinel (`1`) is active; NULL, `0` and anything
    /// else map to inactive.
    pub fn from_code(code: Option<i64>) -> Self {
        match code {
            Some(1) => ReferrerStatus::Active,
            _ => ReferrerStatus::Inactive,
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            ReferrerStatus::Active => 1,
            ReferrerStatus::Inactive => 0,
        }
    }
}
