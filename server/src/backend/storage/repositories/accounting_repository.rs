use anyhow::Result;
use async_trait::async_trait;
use sqlx::{sqlite::SqliteRow, Row};

use super::{decimal_column, enum_column, optional_decimal_column};
use crate::backend::domain::commands::EntryListFilter;
use crate::backend::domain::models::AccountingEntry;
use crate::backend::storage::connection::DbConnection;
use crate::backend::storage::traits::AccountingStorage;

const ENTRY_COLUMNS: &str = "id, lead_id, client_name, entry_type, amount, remaining_amount, commission_closer, commission_formateur, payment_method, payment_date, notes, version, created_at, updated_at";

/// Repository for accounting entry operations
#[derive(Clone)]
pub struct AccountingRepository {
    db: DbConnection,
}

impl AccountingRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_entry(row: &SqliteRow) -> Result<AccountingEntry> {
        Ok(AccountingEntry {
            id: row.try_get("id")?,
            lead_id: row.try_get("lead_id")?,
            client_name: row.try_get("client_name")?,
            entry_type: enum_column(row, "entry_type")?,
            amount: decimal_column(row, "amount")?,
            remaining_amount: optional_decimal_column(row, "remaining_amount")?,
            commission_closer: decimal_column(row, "commission_closer")?,
            commission_formateur: decimal_column(row, "commission_formateur")?,
            payment_method: row.try_get("payment_method")?,
            payment_date: row.try_get("payment_date")?,
            notes: row.try_get("notes")?,
            version: row.try_get("version")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[async_trait]
impl AccountingStorage for AccountingRepository {
    async fn store_entry(&self, entry: &AccountingEntry) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO accounting_entries (id, lead_id, client_name, entry_type, amount, remaining_amount,
                commission_closer, commission_formateur, payment_method, payment_date, notes, version, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entry.id)
        .bind(&entry.lead_id)
        .bind(&entry.client_name)
        .bind(entry.entry_type.as_str())
        .bind(entry.amount.to_string())
        .bind(entry.remaining_amount.map(|remaining| remaining.to_string()))
        .bind(entry.commission_closer.to_string())
        .bind(entry.commission_formateur.to_string())
        .bind(&entry.payment_method)
        .bind(entry.payment_date)
        .bind(&entry.notes)
        .bind(entry.version)
        .bind(entry.created_at)
        .bind(entry.updated_at)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn get_entry(&self, entry_id: &str) -> Result<Option<AccountingEntry>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM accounting_entries WHERE id = ?",
            ENTRY_COLUMNS
        ))
        .bind(entry_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::row_to_entry).transpose()
    }

    async fn list_entries(&self, filter: &EntryListFilter) -> Result<Vec<AccountingEntry>> {
        let mut conditions = Vec::new();
        if filter.lead_id.is_some() {
            conditions.push("lead_id = ?");
        }
        if filter.period.is_some() {
            conditions.push("payment_date >= ? AND payment_date < ?");
        }
        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query_str = format!(
            "SELECT {} FROM accounting_entries {} ORDER BY payment_date DESC, ROWID DESC",
            ENTRY_COLUMNS, where_clause
        );
        let mut query = sqlx::query(&query_str);
        if let Some(lead_id) = &filter.lead_id {
            query = query.bind(lead_id);
        }
        if let Some(period) = &filter.period {
            query = query.bind(period.start).bind(period.end);
        }

        let rows = query.fetch_all(self.db.pool()).await?;
        rows.iter().map(Self::row_to_entry).collect()
    }

    async fn update_entry(&self, entry: &AccountingEntry, expected_version: i64) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE accounting_entries
            SET client_name = ?, entry_type = ?, amount = ?, remaining_amount = ?,
                commission_closer = ?, commission_formateur = ?, payment_method = ?,
                payment_date = ?, notes = ?, version = ?, updated_at = ?
            WHERE id = ? AND version = ?
            "#,
        )
        .bind(&entry.client_name)
        .bind(entry.entry_type.as_str())
        .bind(entry.amount.to_string())
        .bind(entry.remaining_amount.map(|remaining| remaining.to_string()))
        .bind(entry.commission_closer.to_string())
        .bind(entry.commission_formateur.to_string())
        .bind(&entry.payment_method)
        .bind(entry.payment_date)
        .bind(&entry.notes)
        .bind(entry.version)
        .bind(entry.updated_at)
        .bind(&entry.id)
        .bind(expected_version)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_entry(&self, entry_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM accounting_entries WHERE id = ?")
            .bind(entry_id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
