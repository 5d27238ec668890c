use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use tracing::info;

use super::domain::{HouseholdId, Recipient};
use super::repository::RepositoryError;
use super::sqlite::{
    parse_birth_date, valid_income, HouseholdRow, RecipientRow, SqliteHouseholdRepository,
};

/// Loads case-management CSV exports into the SQLite repository.
pub struct HouseholdImporter;

/// Counts reported after a successful import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub households: usize,
    pub recipients: usize,
}

impl HouseholdImporter {
    pub fn from_paths(
        repository: &SqliteHouseholdRepository,
        households: &Path,
        recipients: &Path,
    ) -> Result<ImportSummary, ImportError> {
        let households = File::open(households)?;
        let recipients = File::open(recipients)?;
        Self::from_readers(repository, households, recipients)
    }

    pub fn from_readers<H: Read, R: Read>(
        repository: &SqliteHouseholdRepository,
        households: H,
        recipients: R,
    ) -> Result<ImportSummary, ImportError> {
        let household_rows = parse_households(households)?;
        let known: BTreeSet<&HouseholdId> =
            household_rows.iter().map(|row| &row.household_id).collect();

        let recipient_rows = parse_recipients(recipients)?;
        if let Some((line, row)) = recipient_rows
            .iter()
            .enumerate()
            .find(|(_, row)| !known.contains(&row.household_id))
        {
            return Err(ImportError::UnknownHousehold {
                line: line + 2,
                household_id: row.household_id.clone(),
            });
        }

        repository.store(&household_rows, &recipient_rows)?;

        let summary = ImportSummary {
            households: household_rows.len(),
            recipients: recipient_rows.len(),
        };
        info!(
            households = summary.households,
            recipients = summary.recipients,
            basis = repository.income_basis().label(),
            "household import committed"
        );
        Ok(summary)
    }
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
}

fn parse_households<R: Read>(reader: R) -> Result<Vec<HouseholdRow>, ImportError> {
    let mut rows = Vec::new();
    for (index, record) in csv_reader(reader)
        .deserialize::<HouseholdCsvRow>()
        .enumerate()
    {
        let row = record?;
        if !valid_income(row.household_monthly_income) {
            return Err(ImportError::InvalidIncome {
                line: index + 2,
                value: row.household_monthly_income,
            });
        }

        rows.push(HouseholdRow {
            household_id: HouseholdId(row.household_id),
            stored_income: row.household_monthly_income,
            is_unstable: row.is_unstable,
            household_size: row.household_size,
        });
    }
    Ok(rows)
}

fn parse_recipients<R: Read>(reader: R) -> Result<Vec<RecipientRow>, ImportError> {
    let mut rows = Vec::new();
    for (index, record) in csv_reader(reader)
        .deserialize::<RecipientCsvRow>()
        .enumerate()
    {
        let row = record?;
        let date_of_birth = parse_birth_date(&row.recipient_date_of_birth).ok_or_else(|| {
            ImportError::InvalidDate {
                line: index + 2,
                value: row.recipient_date_of_birth.clone(),
            }
        })?;

        rows.push(RecipientRow {
            household_id: HouseholdId(row.household_id),
            recipient: Recipient {
                date_of_birth,
                veteran: row.recipient_veteran_status,
                has_disability: row.has_disability,
                has_valid_ssi: row.has_valid_ssi,
                has_valid_medicare_card: row.has_valid_medicare_card,
            },
        });
    }
    Ok(rows)
}

#[derive(Debug, Deserialize)]
struct HouseholdCsvRow {
    household_id: String,
    household_monthly_income: f64,
    #[serde(deserialize_with = "flexible_bool")]
    is_unstable: bool,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    household_size: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RecipientCsvRow {
    household_id: String,
    recipient_date_of_birth: String,
    #[serde(deserialize_with = "flexible_bool")]
    recipient_veteran_status: bool,
    #[serde(deserialize_with = "flexible_bool")]
    has_disability: bool,
    #[serde(deserialize_with = "flexible_bool")]
    has_valid_ssi: bool,
    #[serde(deserialize_with = "flexible_bool")]
    has_valid_medicare_card: bool,
}

fn flexible_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "y" => Ok(true),
        "false" | "f" | "0" | "no" | "n" | "" => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "expected a boolean, got '{other}'"
        ))),
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Import failure raised while reading CSV exports.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read import file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}: household income must be a non-negative number, got {value}")]
    InvalidIncome { line: usize, value: f64 },
    #[error("line {line}: unparseable date of birth '{value}'")]
    InvalidDate { line: usize, value: String },
    #[error("line {line}: recipient references household '{household_id}' missing from the households file")]
    UnknownHousehold {
        line: usize,
        household_id: HouseholdId,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
