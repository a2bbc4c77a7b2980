//! Training session scheduling on top of [`compute_session_dates`].

use anyhow::Result;
use chrono::{Datelike, NaiveDate, Utc};
use shared::{CreateTrainingSessionRequest, TrainingFormat};
use std::sync::Arc;
use tracing::info;

use crate::backend::domain::errors::DomainError;
use crate::backend::domain::models::TrainingSession;
use crate::backend::domain::session_dates::{compute_session_dates, SessionDates};
use crate::backend::storage::{Connection, LeadStorage, SessionStorage};

const SESSION: &str = "Training session";

#[derive(Clone)]
pub struct SessionService<C: Connection> {
    session_repository: C::SessionRepository,
    lead_repository: C::LeadRepository,
}

impl<C: Connection> SessionService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            session_repository: connection.create_session_repository(),
            lead_repository: connection.create_lead_repository(),
        }
    }

    /// Compute session dates without storing anything
    pub fn preview_dates(
        &self,
        format: TrainingFormat,
        weekday: Option<&str>,
        anchor_date: &str,
    ) -> Result<SessionDates> {
        let anchor = parse_anchor_date(anchor_date)?;
        let dates = compute_session_dates(format, weekday, anchor)?;
        info!(
            "Previewed {} session from {}: {} -> {}",
            format, anchor, dates.start, dates.end
        );
        Ok(dates)
    }

    pub async fn create_session(&self, request: CreateTrainingSessionRequest) -> Result<TrainingSession> {
        info!(
            "Creating {} session for {} (anchor {})",
            request.format, request.student_name, request.anchor_date
        );

        let student_name = request.student_name.trim();
        if student_name.is_empty() {
            return Err(DomainError::validation("Student name cannot be empty").into());
        }

        if let Some(lead_id) = &request.lead_id {
            if self.lead_repository.get_lead(lead_id).await?.is_none() {
                return Err(DomainError::not_found("Lead", lead_id.as_str()).into());
            }
        }

        let dates = self.preview_dates(request.format, request.weekday.as_deref(), &request.anchor_date)?;
        let weekday = match request.format {
            TrainingFormat::Monthly => dates.occurrences.first().map(|date| date.weekday()),
            TrainingFormat::Weekly | TrainingFormat::FastTrack => None,
        };

        let session = TrainingSession {
            id: TrainingSession::generate_id(),
            lead_id: request.lead_id,
            student_name: student_name.to_string(),
            format: request.format,
            weekday,
            start: dates.start,
            end: dates.end,
            dates: dates.occurrences,
            location: non_empty(request.location),
            notes: non_empty(request.notes),
            created_at: Utc::now(),
        };

        self.session_repository.store_session(&session).await?;
        info!("Created session {} ({} days)", session.id, session.dates.len());

        Ok(session)
    }

    pub async fn get_session(&self, session_id: &str) -> Result<TrainingSession> {
        self.session_repository
            .get_session(session_id)
            .await?
            .ok_or_else(|| DomainError::not_found(SESSION, session_id).into())
    }

    pub async fn list_sessions(&self, lead_id: Option<&str>) -> Result<Vec<TrainingSession>> {
        let sessions = self.session_repository.list_sessions(lead_id).await?;
        info!("Found {} sessions", sessions.len());
        Ok(sessions)
    }

    pub async fn delete_session(&self, session_id: &str) -> Result<()> {
        info!("Deleting session: {}", session_id);
        if !self.session_repository.delete_session(session_id).await? {
            return Err(DomainError::not_found(SESSION, session_id).into());
        }
        Ok(())
    }
}

/// Parse the anchor date; a trailing time of day is ignored
fn parse_anchor_date(value: &str) -> Result<NaiveDate, DomainError> {
    let date_part = value
        .trim()
        .split(|c| c == 'T' || c == ' ')
        .next()
        .unwrap_or_default();
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|_| DomainError::validation(format!("Invalid anchor date (expected YYYY-MM-DD): {}", value)))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
