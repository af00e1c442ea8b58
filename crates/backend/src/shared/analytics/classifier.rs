//! Referrer validity and registration source classification.
//!
//! The Rust predicates and the SQL fragments encode the same rules and must
//! change together.

use chrono::NaiveDateTime;
use contracts::enums::{ReferrerStatus, SourceClass};
use once_cell::sync::Lazy;

use super::dialect::{literal_list, sql_literal, SqlDialect};

/// A roster entry (`marketing_persons` row)
#[derive(Debug, Clone, PartialEq)]
pub struct Referrer {
    pub id: i64,
    pub name: String,
    pub referral_code: String,
    pub status: ReferrerStatus,
    pub join_date: Option<NaiveDateTime>,
}

/// Validity rules for referrers
#[derive(Debug, Clone, PartialEq)]
pub struct ReferrerRules {
    /// Exact names (case-sensitive) that are never valid
    pub denylist: Vec<String>,
    /// Substrings that disqualify a name
    pub forbidden_substrings: Vec<String>,
    /// A valid name is strictly longer than this many characters
    pub min_name_len: usize,
    /// Match `forbidden_substrings` ignoring case
    pub case_insensitive_substrings: bool,
}

impl Default for ReferrerRules {
    fn default() -> Self {
        Self {
            denylist: ["ggh", "gmg", "gh", "tuii", "Marketing Person"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            forbidden_substrings: vec!["test".to_string(), "@".to_string()],
            min_name_len: 3,
            case_insensitive_substrings: false,
        }
    }
}

pub static DEFAULT_RULES: Lazy<ReferrerRules> = Lazy::new(ReferrerRules::default);

/// Validity under the default rules
pub fn is_valid_referrer(referrer: &Referrer) -> bool {
    DEFAULT_RULES.is_valid_referrer(referrer)
}

/// Source classification under the default rules
pub fn classify_source<'a, F>(code: Option<&str>, lookup: F) -> SourceClass
where
    F: Fn(&str) -> Option<&'a Referrer>,
{
    DEFAULT_RULES.classify_source(code, lookup)
}

impl ReferrerRules {
    pub fn is_valid_referrer(&self, referrer: &Referrer) -> bool {
        referrer.status == ReferrerStatus::Active && self.is_valid_name(&referrer.name)
    }

    pub fn is_valid_name(&self, name: &str) -> bool {
        if self.denylist.iter().any(|d| d == name) {
            return false;
        }

        let contains_forbidden = if self.case_insensitive_substrings {
            let lowered = name.to_lowercase();
            self.forbidden_substrings
                .iter()
                .any(|s| lowered.contains(&s.to_lowercase()))
        } else {
            self.forbidden_substrings.iter().any(|s| name.contains(s.as_str()))
        };
        if contains_forbidden {
            return false;
        }

        name.chars().count() > self.min_name_len
    }

    /// Classify a user's referral code. `lookup` resolves a code to its
    /// roster entry.
    pub fn classify_source<'a, F>(&self, code: Option<&str>, lookup: F) -> SourceClass
    where
        F: Fn(&str) -> Option<&'a Referrer>,
    {
        match code {
            None => SourceClass::NoReferralCode,
            Some(code) => match lookup(code) {
                Some(referrer) if self.is_valid_referrer(referrer) => SourceClass::ValidSr,
                Some(_) => SourceClass::InvalidOrTestSr,
                None if code.is_empty() => SourceClass::NoReferralCode,
                None => SourceClass::UnknownCode,
            },
        }
    }

    /// `1` when the joined referrer row `mp` is valid, `0` otherwise
    /// (including when no referrer joined).
    pub fn valid_flag_sql(&self, mp: &str, dialect: SqlDialect) -> String {
        let name = format!("{}.name", mp);
        let mut conditions = vec![
            format!("{}.referral_code IS NOT NULL", mp),
            format!("{}.status = 1", mp),
        ];

        if !self.denylist.is_empty() {
            conditions.push(format!(
                "{} NOT IN {}",
                dialect.binary(&name),
                literal_list(self.denylist.iter().map(String::as_str))
            ));
        }

        for needle in &self.forbidden_substrings {
            let condition = if self.case_insensitive_substrings {
                format!(
                    "INSTR(LOWER({}), {}) = 0",
                    name,
                    sql_literal(&needle.to_lowercase())
                )
            } else {
                format!("INSTR({}, {}) = 0", dialect.binary(&name), sql_literal(needle))
            };
            conditions.push(condition);
        }

        conditions.push(format!("{} > {}", dialect.char_length(&name), self.min_name_len));

        format!("(CASE WHEN {} THEN 1 ELSE 0 END)", conditions.join(" AND "))
    }

    /// Source bucket code (see `SourceClass::code`) for a user row whose
    /// code column is `user_code`, with `mp` LEFT JOINed on that code.
    pub fn source_case_sql(&self, mp: &str, user_code: &str, dialect: SqlDialect) -> String {
        format!(
            "(CASE \
             WHEN {valid} = 1 THEN '{valid_sr}' \
             WHEN {mp}.referral_code IS NOT NULL THEN '{invalid_sr}' \
             WHEN {code} IS NULL OR {code} = '' THEN '{no_code}' \
             ELSE '{unknown}' END)",
            valid = self.valid_flag_sql(mp, dialect),
            mp = mp,
            code = user_code,
            valid_sr = SourceClass::ValidSr.code(),
            invalid_sr = SourceClass::InvalidOrTestSr.code(),
            no_code = SourceClass::NoReferralCode.code(),
            unknown = SourceClass::UnknownCode.code(),
        )
    }
}

#[cfg(test)]
mod tests {
    use maplit::hashmap;

    use super::*;

    fn referrer(id: i64, name: &str, code: &str, status: ReferrerStatus) -> Referrer {
        Referrer {
            id,
            name: name.to_string(),
            referral_code: code.to_string(),
            status,
            join_date: None,
        }
    }

    #[test]
    fn test_denylisted_names_are_never_valid() {
        for name in ["ggh", "gmg", "gh", "tuii", "Marketing Person"] {
            let r = referrer(1, name, "X1", ReferrerStatus::Active);
            assert!(!is_valid_referrer(&r), "{} should be invalid", name);
        }
    }

    #[test]
    fn test_name_rules() {
        let active = |name: &str| referrer(1, name, "A1", ReferrerStatus::Active);
        assert!(is_valid_referrer(&active("Amina Yusuf")));
        assert!(!is_valid_referrer(&active("alice test")));
        assert!(!is_valid_referrer(&active("bob@shop")));
        assert!(!is_valid_referrer(&active("Ann")));
        assert!(is_valid_referrer(&active("Anna")));
        // Case-sensitive by default
        assert!(is_valid_referrer(&active("Test Person")));

        let folding = ReferrerRules {
            case_insensitive_substrings: true,
            ..ReferrerRules::default()
        };
        assert!(!folding.is_valid_name("Test Person"));
    }

    #[test]
    fn test_length_counts_characters() {
        // 3 characters, 6 bytes
        assert!(!DEFAULT_RULES.is_valid_name("Ñaé"));
        assert!(DEFAULT_RULES.is_valid_name("Ñaéz"));
    }

    #[test]
    fn test_classification_buckets() {
        let roster = hashmap! {
            "A1" => referrer(1, "Amina Yusuf", "A1", ReferrerStatus::Active),
            "B1" => referrer(2, "Marketing Person", "B1", ReferrerStatus::Active),
            "C1" => referrer(3, "Chidi Okafor", "C1", ReferrerStatus::Inactive),
        };
        let lookup = |code: &str| roster.get(code);

        assert_eq!(classify_source(Some("A1"), lookup), SourceClass::ValidSr);
        assert_eq!(classify_source(Some("B1"), lookup), SourceClass::InvalidOrTestSr);
        assert_eq!(classify_source(Some("C1"), lookup), SourceClass::InvalidOrTestSr);
        assert_eq!(classify_source(Some("ZZZ"), lookup), SourceClass::UnknownCode);
        assert_eq!(classify_source(Some(""), lookup), SourceClass::NoReferralCode);
        assert_eq!(classify_source(None, lookup), SourceClass::NoReferralCode);
    }

    #[test]
    fn test_deactivation_moves_registration_out_of_valid_bucket() {
        let mut r = referrer(1, "Amina Yusuf", "A1", ReferrerStatus::Active);
        assert_eq!(classify_source(Some("A1"), |_| Some(&r)), SourceClass::ValidSr);

        r.status = ReferrerStatus::Inactive;
        assert_eq!(
            classify_source(Some("A1"), |_| Some(&r)),
            SourceClass::InvalidOrTestSr
        );
    }

    #[test]
    fn test_valid_flag_sql_encodes_every_rule() {
        let sql = DEFAULT_RULES.valid_flag_sql("mp", SqlDialect::Sqlite);
        assert!(sql.starts_with("(CASE WHEN mp.referral_code IS NOT NULL AND mp.status = 1"));
        assert!(sql.contains("mp.name NOT IN ('ggh', 'gmg', 'gh', 'tuii', 'Marketing Person')"));
        assert!(sql.contains("INSTR(mp.name, 'test') = 0"));
        assert!(sql.contains("INSTR(mp.name, '@') = 0"));
        assert!(sql.contains("LENGTH(mp.name) > 3"));
        assert!(sql.ends_with("THEN 1 ELSE 0 END)"));

        let mysql = DEFAULT_RULES.valid_flag_sql("mp", SqlDialect::MySql);
        assert!(mysql.contains("CAST(mp.name AS BINARY) NOT IN"));
        assert!(mysql.contains("CHAR_LENGTH(mp.name) > 3"));
    }

    #[test]
    fn test_source_case_sql_orders_buckets() {
        let sql = DEFAULT_RULES.source_case_sql("mp", "u.referral_code", SqlDialect::Sqlite);
        let valid = sql.find("'valid_sr'").unwrap();
        let invalid = sql.find("'invalid_sr'").unwrap();
        let no_code = sql.find("'no_code'").unwrap();
        let unknown = sql.find("'unknown_code'").unwrap();
        assert!(valid < invalid && invalid < no_code && no_code < unknown);
        assert!(sql.contains("u.referral_code IS NULL OR u.referral_code = ''"));
    }
}
