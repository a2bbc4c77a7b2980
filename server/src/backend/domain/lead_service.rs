//! Lead management: capture, pipeline status and edits.
//!
//! Any status may be set directly by an operator; the only automatic
//! transitions happen when a payment is recorded (see `AccountingService`).

use anyhow::Result;
use chrono::Utc;
use rust_decimal::Decimal;
use shared::{CreateLeadRequest, LeadStatus, UpdateLeadRequest};
use std::sync::Arc;
use tracing::{info, warn};

use crate::backend::domain::errors::DomainError;
use crate::backend::domain::models::{Lead, LeadValidationError};
use crate::backend::domain::payment_recompute::MAX_AMOUNT;
use crate::backend::storage::{Connection, LeadStorage};

pub const MAX_NAME_LENGTH: usize = 100;

#[derive(Clone)]
pub struct LeadService<C: Connection> {
    lead_repository: C::LeadRepository,
}

impl<C: Connection> LeadService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        let lead_repository = connection.create_lead_repository();
        Self { lead_repository }
    }

    pub async fn create_lead(&self, request: CreateLeadRequest) -> Result<Lead> {
        info!("Creating lead: first_name={}", request.first_name);

        validate_first_name(&request.first_name)?;
        validate_name_length(&request.last_name)?;
        let email = normalize_email(request.email)?;
        validate_price(request.fixed_price)?;

        let now = Utc::now();
        let lead = Lead {
            id: Lead::generate_id(),
            first_name: request.first_name.trim().to_string(),
            last_name: request.last_name.trim().to_string(),
            email,
            phone: non_empty(request.phone),
            instrument: non_empty(request.instrument),
            status: LeadStatus::New,
            fixed_price: request.fixed_price,
            closer: non_empty(request.closer),
            notes: non_empty(request.notes),
            created_at: now,
            updated_at: now,
        };

        self.lead_repository.store_lead(&lead).await?;
        info!("Created lead {} ({})", lead.id, lead.full_name());

        Ok(lead)
    }

    pub async fn get_lead(&self, lead_id: &str) -> Result<Lead> {
        match self.lead_repository.get_lead(lead_id).await? {
            Some(lead) => Ok(lead),
            None => {
                warn!("Lead not found: {}", lead_id);
                Err(DomainError::not_found("Lead", lead_id).into())
            }
        }
    }

    pub async fn list_leads(&self, status: Option<LeadStatus>) -> Result<Vec<Lead>> {
        let leads = self.lead_repository.list_leads(status).await?;
        info!("Found {} leads (status filter: {:?})", leads.len(), status);
        Ok(leads)
    }

    /// Apply the fields present in `request`
    pub async fn update_lead(&self, lead_id: &str, request: UpdateLeadRequest) -> Result<Lead> {
        info!("Updating lead: {}", lead_id);

        let mut lead = self.get_lead(lead_id).await?;

        if let Some(first_name) = request.first_name {
            validate_first_name(&first_name)?;
            lead.first_name = first_name.trim().to_string();
        }
        if let Some(last_name) = request.last_name {
            validate_name_length(&last_name)?;
            lead.last_name = last_name.trim().to_string();
        }
        if request.email.is_some() {
            lead.email = normalize_email(request.email)?;
        }
        if let Some(price) = request.fixed_price {
            validate_price(price)?;
            lead.fixed_price = price;
        }
        if request.phone.is_some() {
            lead.phone = non_empty(request.phone);
        }
        if request.instrument.is_some() {
            lead.instrument = non_empty(request.instrument);
        }
        if request.closer.is_some() {
            lead.closer = non_empty(request.closer);
        }
        if request.notes.is_some() {
            lead.notes = non_empty(request.notes);
        }

        self.save(lead).await
    }

    pub async fn update_status(&self, lead_id: &str, status: LeadStatus) -> Result<Lead> {
        let mut lead = self.get_lead(lead_id).await?;
        info!("Lead {} status: {} -> {}", lead_id, lead.status, status);
        lead.status = status;
        self.save(lead).await
    }

    pub async fn delete_lead(&self, lead_id: &str) -> Result<()> {
        info!("Deleting lead: {}", lead_id);
        if !self.lead_repository.delete_lead(lead_id).await? {
            return Err(DomainError::not_found("Lead", lead_id).into());
        }
        Ok(())
    }

    async fn save(&self, mut lead: Lead) -> Result<Lead> {
        lead.updated_at = Utc::now();
        if !self.lead_repository.update_lead(&lead).await? {
            return Err(DomainError::not_found("Lead", lead.id).into());
        }
        Ok(lead)
    }
}

fn validate_first_name(name: &str) -> Result<(), LeadValidationError> {
    if name.trim().is_empty() {
        return Err(LeadValidationError::EmptyFirstName);
    }
    validate_name_length(name)
}

fn validate_name_length(name: &str) -> Result<(), LeadValidationError> {
    if name.trim().chars().count() > MAX_NAME_LENGTH {
        return Err(LeadValidationError::NameTooLong(MAX_NAME_LENGTH));
    }
    Ok(())
}

fn validate_price(price: Option<Decimal>) -> Result<(), LeadValidationError> {
    match price {
        Some(price) if price < Decimal::ZERO => Err(LeadValidationError::NegativePrice),
        Some(price) if price > MAX_AMOUNT => Err(LeadValidationError::PriceTooLarge(MAX_AMOUNT)),
        _ => Ok(()),
    }
}

// Blank email clears it
fn normalize_email(email: Option<String>) -> Result<Option<String>, LeadValidationError> {
    match non_empty(email) {
        Some(email) if !email.contains('@') => Err(LeadValidationError::InvalidEmail(email)),
        email => Ok(email),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
