//! Accounting ledger: payment entries with their commission figures.
//!
//! Every time an entry's amount is set, the closer and formateur commissions
//! and (for deposits) the remaining balance are recomputed through
//! [`recompute_on_amount_edit`]. Edits are guarded by the entry's `version`.

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use shared::{CreateAccountingEntryRequest, EntryType, LeadStatus, UpdateEntryFieldRequest};
use std::sync::Arc;
use tracing::{info, warn};

use crate::backend::domain::commands::{EntryListFilter, MonthPeriod};
use crate::backend::domain::errors::DomainError;
use crate::backend::domain::models::{AccountingEntry, EntryField, Lead};
use crate::backend::domain::payment_recompute::{
    parse_amount, recompute_on_amount_edit, resolve_deposit_total, MAX_AMOUNT,
};
use crate::backend::storage::{AccountingStorage, Connection, LeadStorage};

const ENTRY: &str = "Accounting entry";

#[derive(Clone)]
pub struct AccountingService<C: Connection> {
    entry_repository: C::AccountingRepository,
    lead_repository: C::LeadRepository,
}

impl<C: Connection> AccountingService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            entry_repository: connection.create_accounting_repository(),
            lead_repository: connection.create_lead_repository(),
        }
    }

    /// Record a payment and advance the linked lead along the pipeline
    pub async fn create_entry(&self, request: CreateAccountingEntryRequest) -> Result<AccountingEntry> {
        info!(
            "Creating {} entry: amount={}, lead={:?}",
            request.entry_type, request.amount, request.lead_id
        );

        if request.amount < Decimal::ZERO {
            return Err(DomainError::validation("Amount cannot be negative").into());
        }
        check_amount_cap("Amount", request.amount)?;
        if let Some(total) = request.total_price {
            if total < Decimal::ZERO {
                return Err(DomainError::validation("Total price cannot be negative").into());
            }
            check_amount_cap("Total price", total)?;
        }

        let lead = match &request.lead_id {
            Some(lead_id) => Some(
                self.lead_repository
                    .get_lead(lead_id)
                    .await?
                    .ok_or_else(|| DomainError::not_found("Lead", lead_id.as_str()))?,
            ),
            None => None,
        };

        let client_name = request
            .client_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .or_else(|| lead.as_ref().map(Lead::full_name))
            .ok_or_else(|| DomainError::validation("Client name is required without a lead"))?;

        let payment_date = match request.payment_date.as_deref() {
            Some(date) => parse_payment_date(date)?,
            None => Utc::now().date_naive(),
        };

        let total = request
            .total_price
            .or_else(|| lead.as_ref().and_then(|lead| lead.fixed_price));
        let recompute = recompute_on_amount_edit(request.entry_type, request.amount, total)
            .ok_or_else(|| DomainError::validation("Amount cannot be negative"))?;

        let now = Utc::now();
        let entry = AccountingEntry {
            id: AccountingEntry::generate_id(),
            lead_id: request.lead_id,
            client_name,
            entry_type: request.entry_type,
            amount: recompute.amount,
            remaining_amount: recompute.initial_remaining(),
            commission_closer: recompute.commission_closer,
            commission_formateur: recompute.commission_formateur,
            payment_method: non_empty(request.payment_method),
            payment_date,
            notes: non_empty(request.notes),
            version: 1,
            created_at: now,
            updated_at: now,
        };

        self.entry_repository.store_entry(&entry).await?;
        info!(
            "Created entry {}: amount={}, remaining={:?}",
            entry.id, entry.amount, entry.remaining_amount
        );

        if let Some(lead) = &lead {
            self.advance_lead(lead, entry.entry_type).await?;
        }

        Ok(entry)
    }

    pub async fn get_entry(&self, entry_id: &str) -> Result<AccountingEntry> {
        self.entry_repository
            .get_entry(entry_id)
            .await?
            .ok_or_else(|| DomainError::not_found(ENTRY, entry_id).into())
    }

    pub async fn list_entries(&self, lead_id: Option<String>, month: Option<&str>) -> Result<Vec<AccountingEntry>> {
        let filter = EntryListFilter {
            lead_id,
            period: month.map(MonthPeriod::parse).transpose()?,
        };
        let entries = self.entry_repository.list_entries(&filter).await?;
        info!("Found {} accounting entries for {:?}", entries.len(), filter);
        Ok(entries)
    }

    /// Edit a single field of an entry.
    ///
    /// Editing `amount` recomputes commissions and the remaining balance. A
    /// stale `expected_version`, or a concurrent writer between read and write,
    /// yields [`DomainError::Conflict`].
    pub async fn update_entry_field(
        &self,
        entry_id: &str,
        request: UpdateEntryFieldRequest,
    ) -> Result<AccountingEntry> {
        info!("Updating entry {}: field={}", entry_id, request.field);

        let field: EntryField = request.field.parse().map_err(DomainError::Validation)?;
        let mut entry = self.get_entry(entry_id).await?;

        let read_version = entry.version;
        if let Some(expected) = request.expected_version {
            if expected != read_version {
                return Err(conflict(entry_id, expected).into());
            }
        }

        match field {
            EntryField::Amount => self.apply_amount(&mut entry, &request.value).await?,
            EntryField::ClientName => {
                entry.client_name = optional_text(&request.value, "client_name")?
                    .ok_or_else(|| DomainError::validation("Client name cannot be empty"))?;
            }
            EntryField::PaymentMethod => {
                entry.payment_method = optional_text(&request.value, "payment_method")?;
            }
            EntryField::PaymentDate => {
                let raw = optional_text(&request.value, "payment_date")?
                    .ok_or_else(|| DomainError::validation("Payment date cannot be empty"))?;
                entry.payment_date = parse_payment_date(&raw)?;
            }
            EntryField::Notes => {
                entry.notes = optional_text(&request.value, "notes")?;
            }
        }

        entry.version = read_version + 1;
        entry.updated_at = Utc::now();

        if !self.entry_repository.update_entry(&entry, read_version).await? {
            warn!("Entry {} changed since version {}", entry_id, read_version);
            return Err(conflict(entry_id, read_version).into());
        }

        info!("Updated entry {} to version {}", entry.id, entry.version);
        Ok(entry)
    }

    pub async fn delete_entry(&self, entry_id: &str) -> Result<()> {
        info!("Deleting entry: {}", entry_id);
        if !self.entry_repository.delete_entry(entry_id).await? {
            return Err(DomainError::not_found(ENTRY, entry_id).into());
        }
        Ok(())
    }

    async fn apply_amount(&self, entry: &mut AccountingEntry, value: &Value) -> Result<()> {
        let amount = parse_amount(value)
            .ok_or_else(|| DomainError::validation(format!("Amount must be a number, got {}", value)))?;
        check_amount_cap("Amount", amount)?;

        let total = match entry.entry_type {
            EntryType::Deposit => {
                let lead_price = self.linked_lead_price(entry).await?;
                resolve_deposit_total(lead_price, entry.amount, entry.remaining_amount)
            }
            EntryType::Balance | EntryType::FullPayment => None,
        };

        let recompute = recompute_on_amount_edit(entry.entry_type, amount, total)
            .ok_or_else(|| DomainError::validation("Amount cannot be negative"))?;
        recompute.apply(entry);
        Ok(())
    }

    // A dangling lead id falls back to the entry's own prior total.
    async fn linked_lead_price(&self, entry: &AccountingEntry) -> Result<Option<Decimal>> {
        let Some(lead_id) = &entry.lead_id else {
            return Ok(None);
        };
        match self.lead_repository.get_lead(lead_id).await? {
            Some(lead) => Ok(lead.fixed_price),
            None => {
                warn!(
                    "Lead {} linked to entry {} not found, using the entry's prior total",
                    lead_id, entry.id
                );
                Ok(None)
            }
        }
    }

    // Only the status column is written, and only if it still holds the value
    // read before the entry was stored.
    async fn advance_lead(&self, lead: &Lead, entry_type: EntryType) -> Result<()> {
        let target = match entry_type {
            EntryType::Deposit => LeadStatus::DepositPaid,
            EntryType::Balance | EntryType::FullPayment => LeadStatus::Closed,
        };

        let behind = match (lead.status.pipeline_rank(), target.pipeline_rank()) {
            (Some(current), Some(target)) => current < target,
            _ => false,
        };
        if !behind {
            return Ok(());
        }

        info!("Advancing lead {}: {} -> {}", lead.id, lead.status, target);
        let advanced = self
            .lead_repository
            .transition_status(&lead.id, lead.status, target, Utc::now())
            .await?;
        if !advanced {
            warn!(
                "Lead {} changed or disappeared before it could leave {}, status left as is",
                lead.id, lead.status
            );
        }
        Ok(())
    }
}

fn conflict(entry_id: &str, expected: i64) -> DomainError {
    DomainError::Conflict {
        kind: ENTRY,
        id: entry_id.to_string(),
        expected,
    }
}

fn check_amount_cap(what: &str, value: Decimal) -> Result<(), DomainError> {
    if value > MAX_AMOUNT {
        return Err(DomainError::validation(format!("{} cannot exceed {}", what, MAX_AMOUNT)));
    }
    Ok(())
}

fn parse_payment_date(value: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| DomainError::validation(format!("Invalid payment date (expected YYYY-MM-DD): {}", value)))
}

/// Text value of a field edit; null or blank clears it
fn optional_text(value: &Value, field: &str) -> Result<Option<String>, DomainError> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) => Ok(non_empty(Some(text.clone()))),
        other => Err(DomainError::validation(format!(
            "{} must be a string, got {}",
            field, other
        ))),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::lead_service::LeadService;
    use crate::backend::storage::DbConnection;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use shared::{CreateLeadRequest, UpdateLeadRequest};

    struct Fixture {
        service: AccountingService<DbConnection>,
        leads: LeadService<DbConnection>,
    }

    async fn setup_test() -> Fixture {
        let connection = Arc::new(DbConnection::init_test().await.unwrap());
        Fixture {
            service: AccountingService::new(connection.clone()),
            leads: LeadService::new(connection),
        }
    }

    async fn create_lead(leads: &LeadService<DbConnection>, fixed_price: Option<Decimal>) -> Lead {
        leads
            .create_lead(CreateLeadRequest {
                first_name: "Camille".to_string(),
                last_name: "Martin".to_string(),
                email: None,
                phone: None,
                instrument: Some("Piano".to_string()),
                fixed_price,
                closer: Some("Julie".to_string()),
                notes: None,
            })
            .await
            .unwrap()
    }

    fn entry_request(lead_id: Option<&str>, entry_type: EntryType, amount: Decimal) -> CreateAccountingEntryRequest {
        CreateAccountingEntryRequest {
            lead_id: lead_id.map(str::to_string),
            client_name: None,
            entry_type,
            amount,
            total_price: None,
            payment_method: Some("transfer".to_string()),
            payment_date: Some("2025-06-12".to_string()),
            notes: None,
        }
    }

    fn edit(field: &str, value: Value) -> UpdateEntryFieldRequest {
        UpdateEntryFieldRequest {
            field: field.to_string(),
            value,
            expected_version: None,
        }
    }

    #[tokio::test]
    async fn test_deposit_uses_lead_price_and_advances_lead() {
        let fixture = setup_test().await;
        let lead = create_lead(&fixture.leads, Some(dec!(600))).await;

        let entry = fixture
            .service
            .create_entry(entry_request(Some(&lead.id), EntryType::Deposit, dec!(200)))
            .await
            .unwrap();

        assert_eq!(entry.client_name, "Camille Martin");
        assert_eq!(entry.commission_closer, dec!(20.00));
        assert_eq!(entry.commission_formateur, dec!(10.00));
        assert_eq!(entry.remaining_amount, Some(dec!(400.00)));
        assert_eq!(entry.version, 1);

        let lead = fixture.leads.get_lead(&lead.id).await.unwrap();
        assert_eq!(lead.status, LeadStatus::DepositPaid);
    }

    #[tokio::test]
    async fn test_full_payment_closes_lead_but_not_lost_one() {
        let fixture = setup_test().await;
        let lead = create_lead(&fixture.leads, Some(dec!(600))).await;
        let lost = create_lead(&fixture.leads, None).await;
        fixture.leads.update_status(&lost.id, LeadStatus::Lost).await.unwrap();

        let entry = fixture
            .service
            .create_entry(entry_request(Some(&lead.id), EntryType::FullPayment, dec!(600)))
            .await
            .unwrap();
        assert_eq!(entry.remaining_amount, None);
        assert_eq!(entry.commission_closer, dec!(60.00));
        assert_eq!(fixture.leads.get_lead(&lead.id).await.unwrap().status, LeadStatus::Closed);

        fixture
            .service
            .create_entry(entry_request(Some(&lost.id), EntryType::Balance, dec!(100)))
            .await
            .unwrap();
        assert_eq!(fixture.leads.get_lead(&lost.id).await.unwrap().status, LeadStatus::Lost);
    }

    #[tokio::test]
    async fn test_deposit_does_not_move_closed_lead_back() {
        let fixture = setup_test().await;
        let lead = create_lead(&fixture.leads, Some(dec!(600))).await;
        fixture.leads.update_status(&lead.id, LeadStatus::Closed).await.unwrap();

        fixture
            .service
            .create_entry(entry_request(Some(&lead.id), EntryType::Deposit, dec!(100)))
            .await
            .unwrap();
        assert_eq!(fixture.leads.get_lead(&lead.id).await.unwrap().status, LeadStatus::Closed);
    }

    #[tokio::test]
    async fn test_advance_keeps_concurrent_lead_changes() {
        let fixture = setup_test().await;
        let lead = create_lead(&fixture.leads, Some(dec!(600))).await;
        let snapshot = fixture.leads.get_lead(&lead.id).await.unwrap();

        fixture.leads.update_status(&lead.id, LeadStatus::Lost).await.unwrap();
        fixture.service.advance_lead(&snapshot, EntryType::Deposit).await.unwrap();
        assert_eq!(fixture.leads.get_lead(&lead.id).await.unwrap().status, LeadStatus::Lost);

        let other = create_lead(&fixture.leads, Some(dec!(600))).await;
        let snapshot = fixture.leads.get_lead(&other.id).await.unwrap();
        fixture
            .leads
            .update_lead(
                &other.id,
                UpdateLeadRequest {
                    fixed_price: Some(Some(dec!(900))),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        fixture.service.advance_lead(&snapshot, EntryType::FullPayment).await.unwrap();

        let stored = fixture.leads.get_lead(&other.id).await.unwrap();
        assert_eq!(stored.status, LeadStatus::Closed);
        assert_eq!(stored.fixed_price, Some(dec!(900)));
    }

    #[tokio::test]
    async fn test_create_entry_rejects_bad_input() {
        let fixture = setup_test().await;

        let err = fixture
            .service
            .create_entry(entry_request(Some("lead::missing"), EntryType::Deposit, dec!(100)))
            .await
            .unwrap_err();
        assert!(matches!(err.downcast_ref::<DomainError>(), Some(DomainError::NotFound { .. })));

        let err = fixture
            .service
            .create_entry(entry_request(None, EntryType::Deposit, dec!(100)))
            .await
            .unwrap_err();
        assert!(matches!(err.downcast_ref::<DomainError>(), Some(DomainError::Validation(_))));

        let mut request = entry_request(None, EntryType::Balance, dec!(-5));
        request.client_name = Some("Walk-in".to_string());
        let err = fixture.service.create_entry(request).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<DomainError>(), Some(DomainError::Validation(_))));

        let mut request = entry_request(None, EntryType::Balance, dec!(50000000000000000000000000000));
        request.client_name = Some("Walk-in".to_string());
        let err = fixture.service.create_entry(request).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<DomainError>(), Some(DomainError::Validation(_))));

        let mut request = entry_request(None, EntryType::Deposit, dec!(100));
        request.client_name = Some("Walk-in".to_string());
        request.total_price = Some(MAX_AMOUNT + Decimal::ONE);
        let err = fixture.service.create_entry(request).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<DomainError>(), Some(DomainError::Validation(_))));

        assert!(fixture.service.list_entries(None, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_amount_edit_recomputes_against_lead_price() {
        let fixture = setup_test().await;
        let lead = create_lead(&fixture.leads, Some(dec!(600))).await;
        let entry = fixture
            .service
            .create_entry(entry_request(Some(&lead.id), EntryType::Deposit, dec!(100)))
            .await
            .unwrap();

        let updated = fixture
            .service
            .update_entry_field(&entry.id, edit("amount", json!("200")))
            .await
            .unwrap();

        assert_eq!(updated.amount, dec!(200));
        assert_eq!(updated.commission_closer, dec!(20.00));
        assert_eq!(updated.commission_formateur, dec!(10.00));
        assert_eq!(updated.remaining_amount, Some(dec!(400.00)));
        assert_eq!(updated.version, 2);
    }

    #[tokio::test]
    async fn test_amount_edit_with_deleted_lead_uses_prior_total() {
        let fixture = setup_test().await;
        let lead = create_lead(&fixture.leads, Some(dec!(600))).await;
        let entry = fixture
            .service
            .create_entry(entry_request(Some(&lead.id), EntryType::Deposit, dec!(100)))
            .await
            .unwrap();
        fixture.leads.delete_lead(&lead.id).await.unwrap();

        // prior total = 100 + 500
        let updated = fixture
            .service
            .update_entry_field(&entry.id, edit("amount", json!(250)))
            .await
            .unwrap();
        assert_eq!(updated.remaining_amount, Some(dec!(350.00)));
        assert_eq!(updated.commission_closer, dec!(25.00));
    }

    #[tokio::test]
    async fn test_negative_amount_edit_leaves_entry_untouched() {
        let fixture = setup_test().await;
        let lead = create_lead(&fixture.leads, Some(dec!(600))).await;
        let entry = fixture
            .service
            .create_entry(entry_request(Some(&lead.id), EntryType::Deposit, dec!(200)))
            .await
            .unwrap();

        for value in [json!(-5), json!("abc"), json!(true), json!("1000000000.01")] {
            let err = fixture
                .service
                .update_entry_field(&entry.id, edit("amount", value))
                .await
                .unwrap_err();
            assert!(matches!(err.downcast_ref::<DomainError>(), Some(DomainError::Validation(_))));
        }

        let stored = fixture.service.get_entry(&entry.id).await.unwrap();
        assert_eq!(stored, entry);
    }

    #[tokio::test]
    async fn test_stale_version_conflicts() {
        let fixture = setup_test().await;
        let mut request = entry_request(None, EntryType::Balance, dec!(300));
        request.client_name = Some("Walk-in".to_string());
        let entry = fixture.service.create_entry(request).await.unwrap();

        let mut first = edit("notes", json!("paid in two parts"));
        first.expected_version = Some(1);
        fixture.service.update_entry_field(&entry.id, first).await.unwrap();

        let mut second = edit("notes", json!("overwrite"));
        second.expected_version = Some(1);
        let err = fixture.service.update_entry_field(&entry.id, second).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::Conflict { expected: 1, .. })
        ));

        let stored = fixture.service.get_entry(&entry.id).await.unwrap();
        assert_eq!(stored.notes.as_deref(), Some("paid in two parts"));
        assert_eq!(stored.version, 2);
    }

    #[tokio::test]
    async fn test_text_and_date_edits() {
        let fixture = setup_test().await;
        let mut request = entry_request(None, EntryType::Balance, dec!(300));
        request.client_name = Some("Walk-in".to_string());
        let entry = fixture.service.create_entry(request).await.unwrap();

        let updated = fixture
            .service
            .update_entry_field(&entry.id, edit("payment_date", json!("2025-07-01")))
            .await
            .unwrap();
        assert_eq!(updated.payment_date, NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());

        let updated = fixture
            .service
            .update_entry_field(&entry.id, edit("payment_method", Value::Null))
            .await
            .unwrap();
        assert_eq!(updated.payment_method, None);

        for (field, value) in [
            ("payment_date", json!("01/07/2025")),
            ("client_name", json!("  ")),
            ("commission_closer", json!("0")),
        ] {
            let err = fixture
                .service
                .update_entry_field(&entry.id, edit(field, value))
                .await
                .unwrap_err();
            assert!(matches!(err.downcast_ref::<DomainError>(), Some(DomainError::Validation(_))));
        }
    }

    #[tokio::test]
    async fn test_list_entries_by_month() {
        let fixture = setup_test().await;
        for date in ["2025-05-31", "2025-06-01", "2025-06-30"] {
            let mut request = entry_request(None, EntryType::Balance, dec!(100));
            request.client_name = Some("Walk-in".to_string());
            request.payment_date = Some(date.to_string());
            fixture.service.create_entry(request).await.unwrap();
        }

        assert_eq!(fixture.service.list_entries(None, Some("2025-06")).await.unwrap().len(), 2);
        assert_eq!(fixture.service.list_entries(None, None).await.unwrap().len(), 3);
        assert!(fixture.service.list_entries(None, Some("june")).await.is_err());
    }
}
