use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::LeadStatus;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct Lead {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub instrument: Option<String>,
    pub status: LeadStatus,
    pub fixed_price: Option<Decimal>,
    pub closer: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Lead {
    pub fn generate_id() -> String {
        format!("lead::{}", Uuid::new_v4())
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LeadValidationError {
    #[error("First name cannot be empty")]
    EmptyFirstName,
    #[error("Name cannot exceed {0} characters")]
    NameTooLong(usize),
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),
    #[error("Fixed price cannot be negative")]
    NegativePrice,
    #[error("Fixed price cannot exceed {0}")]
    PriceTooLarge(Decimal),
}
