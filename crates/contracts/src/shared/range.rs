use serde::{Deserialize, Serialize};

/// Query string accepted by every metric endpoint: `?dateRange=7d`
///
/// Accepted tokens: `today | yesterday | 7d | 30d | 3m | 6m | 1y | all |
/// custom:<YYYY-MM-DD>:<YYYY-MM-DD>`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeQuery {
    #[serde(default)]
    pub date_range: Option<String>,
}

impl RangeQuery {
    /// Token to resolve, or the endpoint's default
    pub fn token_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.date_range
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(default)
    }
}

/// `?dateRange=..&sortBy=..` for leaderboard endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardQuery {
    #[serde(default)]
    pub date_range: Option<String>,
    #[serde(default)]
    pub sort_by: Option<String>,
}

impl LeaderboardQuery {
    pub fn range(&self) -> RangeQuery {
        RangeQuery {
            date_range: self.date_range.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_or_default() {
        let q = RangeQuery { date_range: None };
        assert_eq!(q.token_or("30d"), "30d");

        let q = RangeQuery {
            date_range: Some("  ".into()),
        };
        assert_eq!(q.token_or("7d"), "7d");

        let q: RangeQuery =
            serde_json::from_str(r#"{"dateRange":"custom:2025-08-17:2025-08-17"}"#).unwrap();
        assert_eq!(q.token_or("7d"), "custom:2025-08-17:2025-08-17");
    }
}
