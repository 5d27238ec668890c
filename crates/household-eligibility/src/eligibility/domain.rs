use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Opaque identifier for a household record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HouseholdId(pub String);

impl HouseholdId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HouseholdId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HouseholdId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Household attributes as observed at evaluation time.
///
/// `monthly_income` is always a monthly figure; repositories normalize whatever the
/// storage layer records before handing the snapshot out.
#[derive(Debug, Clone, PartialEq)]
pub struct Household {
    pub household_id: HouseholdId,
    pub monthly_income: f64,
    pub is_unstable: bool,
    /// Collected during intake; neither program decision reads it.
    pub household_size: Option<u32>,
}

/// Benefit-relevant attributes of a single household member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub date_of_birth: NaiveDate,
    pub veteran: bool,
    pub has_disability: bool,
    pub has_valid_ssi: bool,
    pub has_valid_medicare_card: bool,
}

impl Recipient {
    /// Recipient with every benefit flag cleared.
    pub fn born_on(date_of_birth: NaiveDate) -> Self {
        Self {
            date_of_birth,
            veteran: false,
            has_disability: false,
            has_valid_ssi: false,
            has_valid_medicare_card: false,
        }
    }
}
