//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::LeadStatus;

use crate::backend::domain::commands::EntryListFilter;
use crate::backend::domain::models::{AccountingEntry, Lead, TrainingSession};

/// Trait defining the interface for lead storage operations
#[async_trait]
pub trait LeadStorage: Send + Sync {
    /// Store a new lead
    async fn store_lead(&self, lead: &Lead) -> Result<()>;

    /// Retrieve a specific lead by ID
    async fn get_lead(&self, lead_id: &str) -> Result<Option<Lead>>;

    /// List leads, newest first, optionally restricted to one status
    async fn list_leads(&self, status: Option<LeadStatus>) -> Result<Vec<Lead>>;

    /// Overwrite an existing lead. Returns false if it does not exist.
    async fn update_lead(&self, lead: &Lead) -> Result<bool>;

    /// Move a lead from `from` to `to` without touching its other columns.
    /// Returns false when the lead is gone or no longer has status `from`.
    async fn transition_status(
        &self,
        lead_id: &str,
        from: LeadStatus,
        to: LeadStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<bool>;

    /// Returns true if the lead was found and deleted
    async fn delete_lead(&self, lead_id: &str) -> Result<bool>;
}

/// Trait defining the interface for accounting entry storage operations
#[async_trait]
pub trait AccountingStorage: Send + Sync {
    async fn store_entry(&self, entry: &AccountingEntry) -> Result<()>;

    async fn get_entry(&self, entry_id: &str) -> Result<Option<AccountingEntry>>;

    /// Entries ordered by payment date descending
    async fn list_entries(&self, filter: &EntryListFilter) -> Result<Vec<AccountingEntry>>;

    /// Write `entry` only if the stored row is still at `expected_version`.
    ///
    /// The stored version becomes `entry.version`. Returns false when the row
    /// is missing or another writer got there first.
    async fn update_entry(&self, entry: &AccountingEntry, expected_version: i64) -> Result<bool>;

    async fn delete_entry(&self, entry_id: &str) -> Result<bool>;
}

/// Trait defining the interface for training session storage operations
#[async_trait]
pub trait SessionStorage: Send + Sync {
    async fn store_session(&self, session: &TrainingSession) -> Result<()>;

    async fn get_session(&self, session_id: &str) -> Result<Option<TrainingSession>>;

    /// Sessions ordered by start date ascending
    async fn list_sessions(&self, lead_id: Option<&str>) -> Result<Vec<TrainingSession>>;

    async fn delete_session(&self, session_id: &str) -> Result<bool>;
}

/// Trait defining the interface for storage connections
///
/// This trait abstracts away the specific connection type and provides
/// factory methods for creating repositories, so the domain layer never
/// names a concrete backend.
pub trait Connection: Send + Sync + Clone + 'static {
    type LeadRepository: LeadStorage + Clone;
    type AccountingRepository: AccountingStorage + Clone;
    type SessionRepository: SessionStorage + Clone;

    fn create_lead_repository(&self) -> Self::LeadRepository;

    fn create_accounting_repository(&self) -> Self::AccountingRepository;

    fn create_session_repository(&self) -> Self::SessionRepository;
}
