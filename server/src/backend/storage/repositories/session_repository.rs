use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, Weekday};
use sqlx::{sqlite::SqliteRow, Row};

use super::enum_column;
use crate::backend::domain::models::TrainingSession;
use crate::backend::storage::connection::DbConnection;
use crate::backend::storage::traits::SessionStorage;

const SESSION_COLUMNS: &str = "id, lead_id, student_name, format, weekday, start_at, end_at, dates, location, notes, created_at";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Repository for training session operations
#[derive(Clone)]
pub struct SessionRepository {
    db: DbConnection,
}

impl SessionRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Session dates are kept as a JSON array of ISO dates
    fn encode_dates(dates: &[NaiveDate]) -> Result<String> {
        let raw: Vec<String> = dates
            .iter()
            .map(|date| date.format(DATE_FORMAT).to_string())
            .collect();
        Ok(serde_json::to_string(&raw)?)
    }

    fn decode_dates(raw: &str) -> Result<Vec<NaiveDate>> {
        let values: Vec<String> =
            serde_json::from_str(raw).with_context(|| format!("Invalid session dates: {}", raw))?;
        values
            .iter()
            .map(|value| {
                NaiveDate::parse_from_str(value, DATE_FORMAT)
                    .with_context(|| format!("Invalid session date: {}", value))
            })
            .collect()
    }

    fn row_to_session(row: &SqliteRow) -> Result<TrainingSession> {
        let weekday: Option<String> = row.try_get("weekday")?;
        let weekday = weekday
            .map(|value| {
                value
                    .parse::<Weekday>()
                    .map_err(|_| anyhow!("Invalid weekday in session row: {}", value))
            })
            .transpose()?;
        let dates: String = row.try_get("dates")?;

        Ok(TrainingSession {
            id: row.try_get("id")?,
            lead_id: row.try_get("lead_id")?,
            student_name: row.try_get("student_name")?,
            format: enum_column(row, "format")?,
            weekday,
            start: row.try_get("start_at")?,
            end: row.try_get("end_at")?,
            dates: Self::decode_dates(&dates)?,
            location: row.try_get("location")?,
            notes: row.try_get("notes")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl SessionStorage for SessionRepository {
    async fn store_session(&self, session: &TrainingSession) -> Result<()> {
        let dates = Self::encode_dates(&session.dates)?;

        sqlx::query(
            r#"
            INSERT INTO training_sessions (id, lead_id, student_name, format, weekday, start_at, end_at, dates, location, notes, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&session.id)
        .bind(&session.lead_id)
        .bind(&session.student_name)
        .bind(session.format.as_str())
        .bind(session.weekday.map(|weekday| weekday.to_string()))
        .bind(session.start)
        .bind(session.end)
        .bind(dates)
        .bind(&session.location)
        .bind(&session.notes)
        .bind(session.created_at)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn get_session(&self, session_id: &str) -> Result<Option<TrainingSession>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM training_sessions WHERE id = ?",
            SESSION_COLUMNS
        ))
        .bind(session_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::row_to_session).transpose()
    }

    async fn list_sessions(&self, lead_id: Option<&str>) -> Result<Vec<TrainingSession>> {
        let rows = match lead_id {
            Some(lead_id) => {
                sqlx::query(&format!(
                    "SELECT {} FROM training_sessions WHERE lead_id = ? ORDER BY start_at ASC, ROWID ASC",
                    SESSION_COLUMNS
                ))
                .bind(lead_id)
                .fetch_all(self.db.pool())
                .await?
            }
            None => {
                sqlx::query(&format!(
                    "SELECT {} FROM training_sessions ORDER BY start_at ASC, ROWID ASC",
                    SESSION_COLUMNS
                ))
                .fetch_all(self.db.pool())
                .await?
            }
        };

        rows.iter().map(Self::row_to_session).collect()
    }

    async fn delete_session(&self, session_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM training_sessions WHERE id = ?")
            .bind(session_id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shared::TrainingFormat;

    async fn setup_test() -> SessionRepository {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        SessionRepository::new(db)
    }

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, DATE_FORMAT).unwrap()
    }

    fn monthly_session(lead_id: Option<&str>, first: &str) -> TrainingSession {
        let first = date(first);
        let dates: Vec<NaiveDate> = (0..4).map(|week| first + chrono::Days::new(week * 7)).collect();
        TrainingSession {
            id: TrainingSession::generate_id(),
            lead_id: lead_id.map(str::to_string),
            student_name: "Camille Martin".to_string(),
            format: TrainingFormat::Monthly,
            weekday: Some(Weekday::Sat),
            start: first.and_hms_opt(9, 0, 0).unwrap(),
            end: dates[3].and_hms_opt(17, 0, 0).unwrap(),
            dates,
            location: Some("Studio B".to_string()),
            notes: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_store_and_get_session_round_trips_dates() {
        let repo = setup_test().await;
        let session = monthly_session(Some("lead::a"), "2025-06-14");
        repo.store_session(&session).await.unwrap();

        let stored = repo.get_session(&session.id).await.unwrap().unwrap();
        assert_eq!(stored.weekday, Some(Weekday::Sat));
        assert_eq!(stored.format, TrainingFormat::Monthly);
        assert_eq!(stored.dates, session.dates);
        assert_eq!(stored.start, session.start);
        assert_eq!(stored.end, session.end);
    }

    #[tokio::test]
    async fn test_list_sessions_ordered_by_start() {
        let repo = setup_test().await;
        repo.store_session(&monthly_session(Some("lead::a"), "2025-07-05")).await.unwrap();
        repo.store_session(&monthly_session(Some("lead::a"), "2025-06-14")).await.unwrap();
        repo.store_session(&monthly_session(Some("lead::b"), "2025-06-07")).await.unwrap();

        let all = repo.list_sessions(None).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].start.date(), date("2025-06-07"));

        let lead_a = repo.list_sessions(Some("lead::a")).await.unwrap();
        assert_eq!(lead_a.len(), 2);
        assert_eq!(lead_a[0].start.date(), date("2025-06-14"));
        assert_eq!(lead_a[1].start.date(), date("2025-07-05"));
    }

    #[tokio::test]
    async fn test_delete_session() {
        let repo = setup_test().await;
        let session = monthly_session(None, "2025-06-14");
        repo.store_session(&session).await.unwrap();

        assert!(repo.delete_session(&session.id).await.unwrap());
        assert!(!repo.delete_session(&session.id).await.unwrap());
        assert!(repo.get_session(&session.id).await.unwrap().is_none());
    }

    #[test]
    fn test_decode_dates_rejects_garbage() {
        assert!(SessionRepository::decode_dates("[\"2025-02-30\"]").is_err());
        assert!(SessionRepository::decode_dates("not json").is_err());
    }
}
