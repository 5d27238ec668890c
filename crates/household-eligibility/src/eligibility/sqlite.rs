use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension};

use super::domain::{Household, HouseholdId, Recipient};
use super::repository::{HouseholdRepository, HouseholdSnapshot, IncomeBasis, RepositoryError};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS households (
    household_id TEXT PRIMARY KEY,
    household_monthly_income REAL NOT NULL,
    is_unstable INTEGER NOT NULL,
    household_size INTEGER
);
CREATE TABLE IF NOT EXISTS recipients (
    recipient_id INTEGER PRIMARY KEY,
    household_id TEXT NOT NULL,
    recipient_date_of_birth TEXT NOT NULL,
    recipient_veteran_status INTEGER NOT NULL,
    has_disability INTEGER NOT NULL,
    has_valid_ssi INTEGER NOT NULL,
    has_valid_medicare_card INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_recipients_household ON recipients (household_id);
";

/// Household row as stored, income still in the table's basis.
#[derive(Debug, Clone, PartialEq)]
pub struct HouseholdRow {
    pub household_id: HouseholdId,
    pub stored_income: f64,
    pub is_unstable: bool,
    pub household_size: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecipientRow {
    pub household_id: HouseholdId,
    pub recipient: Recipient,
}

/// SQLite-backed repository over the case-management `households`/`recipients` tables.
pub struct SqliteHouseholdRepository {
    connection: Mutex<Connection>,
    income_basis: IncomeBasis,
}

impl SqliteHouseholdRepository {
    pub fn open(path: impl AsRef<Path>, income_basis: IncomeBasis) -> Result<Self, RepositoryError> {
        let connection = Connection::open(path).map_err(classify)?;
        Self::from_connection(connection, income_basis)
    }

    pub fn open_in_memory(income_basis: IncomeBasis) -> Result<Self, RepositoryError> {
        let connection = Connection::open_in_memory().map_err(classify)?;
        Self::from_connection(connection, income_basis)
    }

    pub fn from_connection(
        connection: Connection,
        income_basis: IncomeBasis,
    ) -> Result<Self, RepositoryError> {
        connection.execute_batch(SCHEMA).map_err(classify)?;
        Ok(Self {
            connection: Mutex::new(connection),
            income_basis,
        })
    }

    pub fn income_basis(&self) -> IncomeBasis {
        self.income_basis
    }

    /// Upsert households and replace their recipients in a single transaction.
    pub fn store(
        &self,
        households: &[HouseholdRow],
        recipients: &[RecipientRow],
    ) -> Result<(), RepositoryError> {
        let mut connection = self.lock()?;
        let tx = connection.transaction().map_err(classify)?;

        for household in households {
            tx.execute(
                "INSERT INTO households (household_id, household_monthly_income, is_unstable, household_size)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT (household_id) DO UPDATE SET
                    household_monthly_income = excluded.household_monthly_income,
                    is_unstable = excluded.is_unstable,
                    household_size = excluded.household_size",
                params![
                    household.household_id.as_str(),
                    household.stored_income,
                    household.is_unstable,
                    household.household_size,
                ],
            )
            .map_err(classify)?;
            tx.execute(
                "DELETE FROM recipients WHERE household_id = ?1",
                params![household.household_id.as_str()],
            )
            .map_err(classify)?;
        }

        for row in recipients {
            let recipient = &row.recipient;
            tx.execute(
                "INSERT INTO recipients (household_id, recipient_date_of_birth, recipient_veteran_status,
                    has_disability, has_valid_ssi, has_valid_medicare_card)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    row.household_id.as_str(),
                    recipient.date_of_birth.format("%Y-%m-%d").to_string(),
                    recipient.veteran,
                    recipient.has_disability,
                    recipient.has_valid_ssi,
                    recipient.has_valid_medicare_card,
                ],
            )
            .map_err(classify)?;
        }

        tx.commit().map_err(classify)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, RepositoryError> {
        self.connection
            .lock()
            .map_err(|_| RepositoryError::Unavailable("connection lock poisoned".to_string()))
    }
}

impl HouseholdRepository for SqliteHouseholdRepository {
    fn household(&self, id: &HouseholdId) -> Result<Option<Household>, RepositoryError> {
        let connection = self.lock()?;
        fetch_household(&connection, id, self.income_basis)
    }

    fn recipients(&self, id: &HouseholdId) -> Result<Vec<Recipient>, RepositoryError> {
        let connection = self.lock()?;
        fetch_recipients(&connection, id)
    }

    fn snapshot(&self, id: &HouseholdId) -> Result<Option<HouseholdSnapshot>, RepositoryError> {
        let connection = self.lock()?;
        // Read transaction so writers on other connections cannot commit between the two reads.
        let tx = connection.unchecked_transaction().map_err(classify)?;

        let Some(household) = fetch_household(&tx, id, self.income_basis)? else {
            return Ok(None);
        };
        let recipients = fetch_recipients(&tx, id)?;
        tx.finish().map_err(classify)?;

        Ok(Some(HouseholdSnapshot {
            household,
            recipients,
        }))
    }
}

fn fetch_household(
    connection: &Connection,
    id: &HouseholdId,
    income_basis: IncomeBasis,
) -> Result<Option<Household>, RepositoryError> {
    let row = connection
        .query_row(
            "SELECT household_monthly_income, is_unstable, household_size
             FROM households
             WHERE household_id = ?1",
            params![id.as_str()],
            |row| {
                Ok((
                    row.get::<_, f64>(0)?,
                    row.get::<_, bool>(1)?,
                    row.get::<_, Option<u32>>(2)?,
                ))
            },
        )
        .optional()
        .map_err(classify)?;

    let Some((stored_income, is_unstable, household_size)) = row else {
        return Ok(None);
    };

    if !valid_income(stored_income) {
        return Err(RepositoryError::Malformed(format!(
            "household {id} has invalid income {stored_income}"
        )));
    }

    Ok(Some(Household {
        household_id: id.clone(),
        monthly_income: income_basis.to_monthly(stored_income),
        is_unstable,
        household_size,
    }))
}

fn fetch_recipients(
    connection: &Connection,
    id: &HouseholdId,
) -> Result<Vec<Recipient>, RepositoryError> {
    let mut statement = connection
        .prepare(
            "SELECT recipient_date_of_birth, recipient_veteran_status, has_disability,
                    has_valid_ssi, has_valid_medicare_card
             FROM recipients
             WHERE household_id = ?1
             ORDER BY recipient_id",
        )
        .map_err(classify)?;

    let rows = statement
        .query_map(params![id.as_str()], |row| {
            Ok(RawRecipient {
                date_of_birth: row.get(0)?,
                veteran: row.get(1)?,
                has_disability: row.get(2)?,
                has_valid_ssi: row.get(3)?,
                has_valid_medicare_card: row.get(4)?,
            })
        })
        .map_err(classify)?;

    let mut recipients = Vec::new();
    for row in rows {
        let raw = row.map_err(classify)?;
        let date_of_birth = parse_birth_date(&raw.date_of_birth).ok_or_else(|| {
            RepositoryError::Malformed(format!(
                "recipient of household {id} has unparseable date of birth '{}'",
                raw.date_of_birth
            ))
        })?;

        recipients.push(Recipient {
            date_of_birth,
            veteran: raw.veteran,
            has_disability: raw.has_disability,
            has_valid_ssi: raw.has_valid_ssi,
            has_valid_medicare_card: raw.has_valid_medicare_card,
        });
    }

    Ok(recipients)
}

/// Stored incomes must be finite and non-negative in either basis.
pub(crate) fn valid_income(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

struct RawRecipient {
    date_of_birth: String,
    veteran: bool,
    has_disability: bool,
    has_valid_ssi: bool,
    has_valid_medicare_card: bool,
}

pub(crate) fn parse_birth_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|dt| dt.date())
}

fn classify(err: rusqlite::Error) -> RepositoryError {
    match err {
        rusqlite::Error::InvalidColumnType(..)
        | rusqlite::Error::FromSqlConversionFailure(..)
        | rusqlite::Error::IntegralValueOutOfRange(..) => RepositoryError::Malformed(err.to_string()),
        other => RepositoryError::Unavailable(other.to_string()),
    }
}
