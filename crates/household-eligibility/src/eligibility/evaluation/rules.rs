use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::super::domain::{Household, Recipient};
use super::config::EvaluationConfig;

/// Average calendar year length, leap years included.
pub const DAYS_PER_YEAR: f64 = 365.25;
pub const SENIOR_AGE_YEARS: f64 = 65.0;

/// Fractional age in years on `as_of`. Negative for birth dates after `as_of`.
pub fn age_in_years(date_of_birth: NaiveDate, as_of: NaiveDate) -> f64 {
    (as_of - date_of_birth).num_days() as f64 / DAYS_PER_YEAR
}

pub fn is_senior(date_of_birth: NaiveDate, as_of: NaiveDate) -> bool {
    age_in_years(date_of_birth, as_of) >= SENIOR_AGE_YEARS
}

pub(crate) fn income_within_threshold(household: &Household, config: &EvaluationConfig) -> bool {
    household.monthly_income <= config.monthly_income_threshold()
}

/// Household-level OR of every recipient attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientSignals {
    pub any_senior: bool,
    pub any_veteran: bool,
    pub any_disability: bool,
    pub any_valid_ssi: bool,
    pub any_valid_medicare: bool,
}

impl RecipientSignals {
    pub fn from_recipient(recipient: &Recipient, as_of: NaiveDate) -> Self {
        Self {
            any_senior: is_senior(recipient.date_of_birth, as_of),
            any_veteran: recipient.veteran,
            any_disability: recipient.has_disability,
            any_valid_ssi: recipient.has_valid_ssi,
            any_valid_medicare: recipient.has_valid_medicare_card,
        }
    }

    pub fn merge(self, other: Self) -> Self {
        Self {
            any_senior: self.any_senior || other.any_senior,
            any_veteran: self.any_veteran || other.any_veteran,
            any_disability: self.any_disability || other.any_disability,
            any_valid_ssi: self.any_valid_ssi || other.any_valid_ssi,
            any_valid_medicare: self.any_valid_medicare || other.any_valid_medicare,
        }
    }
}

pub(crate) fn aggregate_recipients(recipients: &[Recipient], as_of: NaiveDate) -> RecipientSignals {
    recipients
        .iter()
        .map(|recipient| RecipientSignals::from_recipient(recipient, as_of))
        .fold(RecipientSignals::default(), RecipientSignals::merge)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date")
    }

    #[test]
    fn age_counts_leap_days_on_average() {
        let born = NaiveDate::from_ymd_opt(2020, 3, 1).expect("valid date");
        let age = age_in_years(born, as_of());
        // 1461 days across one leap cycle
        assert_eq!(age, 4.0);
    }

    #[test]
    fn senior_boundary_falls_on_the_first_whole_day_past_65_years() {
        let at_boundary = as_of() - chrono::Duration::days(23_742);
        let just_short = as_of() - chrono::Duration::days(23_741);

        assert!(age_in_years(at_boundary, as_of()) >= 65.0);
        assert!(is_senior(at_boundary, as_of()));
        assert!(age_in_years(just_short, as_of()) < 65.0);
        assert!(!is_senior(just_short, as_of()));
    }

    #[test]
    fn future_birth_dates_are_not_senior() {
        let born = as_of() + chrono::Duration::days(30);
        assert!(age_in_years(born, as_of()) < 0.0);
        assert!(!is_senior(born, as_of()));
    }

    #[test]
    fn merge_is_commutative() {
        let left = RecipientSignals {
            any_veteran: true,
            ..RecipientSignals::default()
        };
        let right = RecipientSignals {
            any_valid_ssi: true,
            ..RecipientSignals::default()
        };

        assert_eq!(left.merge(right), right.merge(left));
    }
}
