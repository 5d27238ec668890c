use super::domain::{Household, HouseholdId, Recipient};

/// Read-only storage abstraction so the service can be exercised with fakes.
///
/// Implementations must bind `id` as a query parameter and return monthly income.
pub trait HouseholdRepository: Send + Sync {
    fn household(&self, id: &HouseholdId) -> Result<Option<Household>, RepositoryError>;
    fn recipients(&self, id: &HouseholdId) -> Result<Vec<Recipient>, RepositoryError>;

    /// Household and recipients read as one consistent view.
    ///
    /// Stores with concurrent writers override this to read both under one lock or
    /// transaction.
    fn snapshot(&self, id: &HouseholdId) -> Result<Option<HouseholdSnapshot>, RepositoryError> {
        let Some(household) = self.household(id)? else {
            return Ok(None);
        };
        let recipients = self.recipients(id)?;
        Ok(Some(HouseholdSnapshot {
            household,
            recipients,
        }))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HouseholdSnapshot {
    pub household: Household,
    pub recipients: Vec<Recipient>,
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),
    #[error("malformed record: {0}")]
    Malformed(String),
}

/// Unit of the stored income column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IncomeBasis {
    #[default]
    Monthly,
    Annual,
}

impl IncomeBasis {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "monthly" | "month" => Some(Self::Monthly),
            "annual" | "yearly" | "year" => Some(Self::Annual),
            _ => None,
        }
    }

    pub fn to_monthly(self, stored: f64) -> f64 {
        match self {
            IncomeBasis::Monthly => stored,
            IncomeBasis::Annual => stored / 12.0,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            IncomeBasis::Monthly => "monthly",
            IncomeBasis::Annual => "annual",
        }
    }
}
