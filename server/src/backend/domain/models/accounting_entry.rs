use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use shared::EntryType;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct AccountingEntry {
    pub id: String,
    pub lead_id: Option<String>,
    pub client_name: String,
    pub entry_type: EntryType,
    pub amount: Decimal,
    pub remaining_amount: Option<Decimal>,
    pub commission_closer: Decimal,
    pub commission_formateur: Decimal,
    pub payment_method: Option<String>,
    pub payment_date: NaiveDate,
    pub notes: Option<String>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AccountingEntry {
    pub fn generate_id() -> String {
        format!("entry::{}", Uuid::new_v4())
    }
}

/// Columns an operator may edit one at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryField {
    Amount,
    ClientName,
    PaymentMethod,
    PaymentDate,
    Notes,
}

impl FromStr for EntryField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "amount" => Ok(EntryField::Amount),
            "client_name" => Ok(EntryField::ClientName),
            "payment_method" => Ok(EntryField::PaymentMethod),
            "payment_date" => Ok(EntryField::PaymentDate),
            "notes" => Ok(EntryField::Notes),
            other => Err(format!("Field cannot be edited: {}", other)),
        }
    }
}
