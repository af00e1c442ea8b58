use serde::{Deserialize, Serialize};

/// Where a registration came from, relative to the referrer roster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceClass {
    /// Code matches a referrer that passes every validity rule
    ValidSr,
    /// Code matches a referrer that fails at least one rule
    InvalidOrTestSr,
    /// No code at all (NULL or empty)
    NoReferralCode,
    /// Code present but unknown to the roster
    UnknownCode,
}

impl SourceClass {
    /// Bucket code emitted by the SQL CASE expression
    pub fn code(&self) -> &'static str {
        match self {
            SourceClass::ValidSr => "valid_sr",
            SourceClass::InvalidOrTestSr => "invalid_sr",
            SourceClass::NoReferralCode => "no_code",
            SourceClass::UnknownCode => "unknown_code",
        }
    }

    /// Label used by the dashboard legend
    pub fn label(&self) -> &'static str {
        match self {
            SourceClass::ValidSr => "Valid SR",
            SourceClass::InvalidOrTestSr => "Invalid/Test SR",
            SourceClass::NoReferralCode => "No Referral Code",
            SourceClass::UnknownCode => "Random/Unknown Code",
        }
    }

    pub fn all() -> [SourceClass; 4] {
        [
            SourceClass::ValidSr,
            SourceClass::InvalidOrTestSr,
            SourceClass::NoReferralCode,
            SourceClass::UnknownCode,
        ]
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::all().into_iter().find(|c| c.code() == code)
    }

    /// SR-linked means attributable to a valid referrer; everything else is direct
    pub fn is_sr_linked(&self) -> bool {
        matches!(self, SourceClass::ValidSr)
    }
}
