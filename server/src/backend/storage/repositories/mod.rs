// Repository modules
pub mod accounting_repository;
pub mod lead_repository;
pub mod session_repository;

// Re-export repository types
pub use accounting_repository::AccountingRepository;
pub use lead_repository::LeadRepository;
pub use session_repository::SessionRepository;

use anyhow::{anyhow, Context, Result};
use rust_decimal::Decimal;
use sqlx::{sqlite::SqliteRow, Row};
use std::str::FromStr;

// SQLite has no decimal type, amounts live in TEXT columns.

fn decimal_column(row: &SqliteRow, column: &str) -> Result<Decimal> {
    let raw: String = row.try_get(column)?;
    raw.parse::<Decimal>()
        .with_context(|| format!("Invalid decimal in column {}: {}", column, raw))
}

fn optional_decimal_column(row: &SqliteRow, column: &str) -> Result<Option<Decimal>> {
    let raw: Option<String> = row.try_get(column)?;
    raw.map(|value| {
        value
            .parse::<Decimal>()
            .with_context(|| format!("Invalid decimal in column {}: {}", column, value))
    })
    .transpose()
}

fn enum_column<T>(row: &SqliteRow, column: &str) -> Result<T>
where
    T: FromStr<Err = String>,
{
    let raw: String = row.try_get(column)?;
    raw.parse::<T>().map_err(|e| anyhow!("Column {}: {}", column, e))
}
