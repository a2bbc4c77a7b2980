use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc, Weekday};
use shared::TrainingFormat;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSession {
    pub id: String,
    pub lead_id: Option<String>,
    pub student_name: String,
    pub format: TrainingFormat,
    /// Only set for monthly sessions
    pub weekday: Option<Weekday>,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub dates: Vec<NaiveDate>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TrainingSession {
    pub fn generate_id() -> String {
        format!("session::{}", Uuid::new_v4())
    }
}
