use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::LeadStatus;
use sqlx::{sqlite::SqliteRow, Row};

use super::{enum_column, optional_decimal_column};
use crate::backend::domain::models::Lead;
use crate::backend::storage::connection::DbConnection;
use crate::backend::storage::traits::LeadStorage;

const LEAD_COLUMNS: &str = "id, first_name, last_name, email, phone, instrument, status, fixed_price, closer, notes, created_at, updated_at";

/// Repository for lead operations
#[derive(Clone)]
pub struct LeadRepository {
    db: DbConnection,
}

impl LeadRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_lead(row: &SqliteRow) -> Result<Lead> {
        Ok(Lead {
            id: row.try_get("id")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            instrument: row.try_get("instrument")?,
            status: enum_column(row, "status")?,
            fixed_price: optional_decimal_column(row, "fixed_price")?,
            closer: row.try_get("closer")?,
            notes: row.try_get("notes")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[async_trait]
impl LeadStorage for LeadRepository {
    async fn store_lead(&self, lead: &Lead) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO leads (id, first_name, last_name, email, phone, instrument, status, fixed_price, closer, notes, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&lead.id)
        .bind(&lead.first_name)
        .bind(&lead.last_name)
        .bind(&lead.email)
        .bind(&lead.phone)
        .bind(&lead.instrument)
        .bind(lead.status.as_str())
        .bind(lead.fixed_price.map(|price| price.to_string()))
        .bind(&lead.closer)
        .bind(&lead.notes)
        .bind(lead.created_at)
        .bind(lead.updated_at)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn get_lead(&self, lead_id: &str) -> Result<Option<Lead>> {
        let row = sqlx::query(&format!("SELECT {} FROM leads WHERE id = ?", LEAD_COLUMNS))
            .bind(lead_id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(Self::row_to_lead).transpose()
    }

    async fn list_leads(&self, status: Option<LeadStatus>) -> Result<Vec<Lead>> {
        let rows = if let Some(status) = status {
            sqlx::query(&format!(
                "SELECT {} FROM leads WHERE status = ? ORDER BY created_at DESC, ROWID DESC",
                LEAD_COLUMNS
            ))
            .bind(status.as_str())
            .fetch_all(self.db.pool())
            .await?
        } else {
            sqlx::query(&format!(
                "SELECT {} FROM leads ORDER BY created_at DESC, ROWID DESC",
                LEAD_COLUMNS
            ))
            .fetch_all(self.db.pool())
            .await?
        };

        rows.iter().map(Self::row_to_lead).collect()
    }

    async fn update_lead(&self, lead: &Lead) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE leads
            SET first_name = ?, last_name = ?, email = ?, phone = ?, instrument = ?, status = ?,
                fixed_price = ?, closer = ?, notes = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&lead.first_name)
        .bind(&lead.last_name)
        .bind(&lead.email)
        .bind(&lead.phone)
        .bind(&lead.instrument)
        .bind(lead.status.as_str())
        .bind(lead.fixed_price.map(|price| price.to_string()))
        .bind(&lead.closer)
        .bind(&lead.notes)
        .bind(lead.updated_at)
        .bind(&lead.id)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn transition_status(
        &self,
        lead_id: &str,
        from: LeadStatus,
        to: LeadStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<bool> {
        let result = sqlx::query("UPDATE leads SET status = ?, updated_at = ? WHERE id = ? AND status = ?")
            .bind(to.as_str())
            .bind(updated_at)
            .bind(lead_id)
            .bind(from.as_str())
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_lead(&self, lead_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM leads WHERE id = ?")
            .bind(lead_id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
