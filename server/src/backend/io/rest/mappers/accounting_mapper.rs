use super::DATE_FORMAT;
use crate::backend::domain::models::AccountingEntry as DomainEntry;
use shared::{AccountingEntry as SharedEntry, AccountingEntryListResponse, AccountingEntryResponse};

/// Mapper to convert domain accounting entries into shared DTOs.
pub struct AccountingMapper;

impl AccountingMapper {
    pub fn to_dto(domain: DomainEntry) -> SharedEntry {
        SharedEntry {
            id: domain.id,
            lead_id: domain.lead_id,
            client_name: domain.client_name,
            entry_type: domain.entry_type,
            amount: domain.amount,
            remaining_amount: domain.remaining_amount,
            commission_closer: domain.commission_closer,
            commission_formateur: domain.commission_formateur,
            payment_method: domain.payment_method,
            payment_date: domain.payment_date.format(DATE_FORMAT).to_string(),
            notes: domain.notes,
            version: domain.version,
            created_at: domain.created_at.to_rfc3339(),
            updated_at: domain.updated_at.to_rfc3339(),
        }
    }

    pub fn to_response(domain: DomainEntry, success_message: &str) -> AccountingEntryResponse {
        AccountingEntryResponse {
            entry: Self::to_dto(domain),
            success_message: success_message.to_string(),
        }
    }

    pub fn to_list_dto(domain_entries: Vec<DomainEntry>) -> AccountingEntryListResponse {
        AccountingEntryListResponse {
            entries: domain_entries.into_iter().map(Self::to_dto).collect(),
        }
    }
}
