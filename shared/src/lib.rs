use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Position of a lead in the sales pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
    Called,
    Closing,
    DepositPaid,
    Closed,
    Lost,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 6] = [
        LeadStatus::New,
        LeadStatus::Called,
        LeadStatus::Closing,
        LeadStatus::DepositPaid,
        LeadStatus::Closed,
        LeadStatus::Lost,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Called => "called",
            LeadStatus::Closing => "closing",
            LeadStatus::DepositPaid => "deposit_paid",
            LeadStatus::Closed => "closed",
            LeadStatus::Lost => "lost",
        }
    }

    /// Ordering along the pipeline. `Lost` sits outside the pipeline and has no rank.
    pub fn pipeline_rank(&self) -> Option<u8> {
        match self {
            LeadStatus::New => Some(0),
            LeadStatus::Called => Some(1),
            LeadStatus::Closing => Some(2),
            LeadStatus::DepositPaid => Some(3),
            LeadStatus::Closed => Some(4),
            LeadStatus::Lost => None,
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeadStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LeadStatus::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Unknown lead status: {}", s))
    }
}

/// Kind of payment event recorded in the accounting ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    Deposit,
    Balance,
    FullPayment,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Deposit => "deposit",
            EntryType::Balance => "balance",
            EntryType::FullPayment => "full_payment",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deposit" => Ok(EntryType::Deposit),
            "balance" => Ok(EntryType::Balance),
            "full_payment" => Ok(EntryType::FullPayment),
            other => Err(format!("Unknown entry type: {}", other)),
        }
    }
}

/// Scheduling format of a training session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingFormat {
    /// Monday to Friday of a single week
    Weekly,
    /// Four consecutive Saturdays or Sundays
    Monthly,
    /// Two consecutive days
    FastTrack,
}

impl TrainingFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrainingFormat::Weekly => "weekly",
            TrainingFormat::Monthly => "monthly",
            TrainingFormat::FastTrack => "fast_track",
        }
    }
}

impl fmt::Display for TrainingFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrainingFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekly" => Ok(TrainingFormat::Weekly),
            "monthly" => Ok(TrainingFormat::Monthly),
            "fast_track" => Ok(TrainingFormat::FastTrack),
            other => Err(format!("Unknown training format: {}", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Leads
// ---------------------------------------------------------------------------

/// Lead ID in format: "lead::<uuid>"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Instrument the prospect wants to train on
    pub instrument: Option<String>,
    pub status: LeadStatus,
    /// Agreed total price of the training, if already quoted
    pub fixed_price: Option<Decimal>,
    /// Name of the closer working this lead
    pub closer: Option<String>,
    pub notes: Option<String>,
    /// RFC 3339
    pub created_at: String,
    /// RFC 3339
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateLeadRequest {
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub instrument: Option<String>,
    pub fixed_price: Option<Decimal>,
    pub closer: Option<String>,
    pub notes: Option<String>,
}

/// Partial update, `None` leaves the field as is.
///
/// Text fields are cleared with `""`; `fixed_price` is cleared with an
/// explicit `null`, which arrives as `Some(None)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateLeadRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub instrument: Option<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub fixed_price: Option<Option<Decimal>>,
    pub closer: Option<String>,
    pub notes: Option<String>,
}

// Only called when the key is present, so `null` becomes `Some(None)`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateLeadStatusRequest {
    pub status: LeadStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadResponse {
    pub lead: Lead,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadListResponse {
    pub leads: Vec<Lead>,
}

// ---------------------------------------------------------------------------
// Accounting
// ---------------------------------------------------------------------------

/// Accounting entry ID in format: "entry::<uuid>"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountingEntry {
    pub id: String,
    pub lead_id: Option<String>,
    pub client_name: String,
    pub entry_type: EntryType,
    pub amount: Decimal,
    /// Balance still owed after a deposit; always null for other entry types
    pub remaining_amount: Option<Decimal>,
    /// 10% of the amount
    pub commission_closer: Decimal,
    /// 5% of the amount
    pub commission_formateur: Decimal,
    pub payment_method: Option<String>,
    /// YYYY-MM-DD
    pub payment_date: String,
    pub notes: Option<String>,
    /// Incremented on every write, used for optimistic concurrency
    pub version: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAccountingEntryRequest {
    pub lead_id: Option<String>,
    /// Defaults to the linked lead's full name
    pub client_name: Option<String>,
    pub entry_type: EntryType,
    pub amount: Decimal,
    /// Overrides the linked lead's fixed price when computing a deposit's remaining balance
    pub total_price: Option<Decimal>,
    pub payment_method: Option<String>,
    /// YYYY-MM-DD, defaults to today
    pub payment_date: Option<String>,
    pub notes: Option<String>,
}

/// Edit of a single column of an accounting entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateEntryFieldRequest {
    /// One of: amount, client_name, payment_method, payment_date, notes
    pub field: String,
    pub value: serde_json::Value,
    /// When set, the edit is rejected if the entry changed since this version was read
    pub expected_version: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountingEntryResponse {
    pub entry: AccountingEntry,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountingEntryListResponse {
    pub entries: Vec<AccountingEntry>,
}

// ---------------------------------------------------------------------------
// Training sessions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDatesRequest {
    pub format: TrainingFormat,
    /// Required for monthly format: "sat"/"saturday" or "sun"/"sunday"
    pub weekday: Option<String>,
    /// YYYY-MM-DD
    pub anchor_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDatesResponse {
    /// YYYY-MM-DDTHH:MM:SS
    pub start_date: String,
    /// YYYY-MM-DDTHH:MM:SS
    pub end_date: String,
    /// Every training day, YYYY-MM-DD
    pub dates: Vec<String>,
}

/// Training session ID in format: "session::<uuid>"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSession {
    pub id: String,
    pub lead_id: Option<String>,
    pub student_name: String,
    pub format: TrainingFormat,
    pub weekday: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub dates: Vec<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTrainingSessionRequest {
    pub lead_id: Option<String>,
    pub student_name: String,
    pub format: TrainingFormat,
    pub weekday: Option<String>,
    pub anchor_date: String,
    pub location: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSessionResponse {
    pub session: TrainingSession,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSessionListResponse {
    pub sessions: Vec<TrainingSession>,
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineReport {
    /// "YYYY-MM" or "all"
    pub period: String,
    pub generated_at: String,
    /// Lead count per status, keyed by the status' snake_case name
    pub lead_counts: BTreeMap<String, u32>,
    /// Closed leads as a percentage of all leads
    pub conversion_rate: Decimal,
    pub entry_count: u32,
    pub total_collected: Decimal,
    pub total_outstanding: Decimal,
    pub total_commission_closer: Decimal,
    pub total_commission_formateur: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineReportResponse {
    pub report: PipelineReport,
    /// True when served from the report cache
    pub cached: bool,
}

/// Error body returned by every endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}
