use super::{DATE_FORMAT, DATE_TIME_FORMAT};
use crate::backend::domain::models::TrainingSession as DomainSession;
use crate::backend::domain::session_dates::SessionDates;
use chrono::{NaiveDate, Weekday};
use shared::{
    SessionDatesResponse, TrainingSession as SharedSession, TrainingSessionListResponse,
    TrainingSessionResponse,
};

/// Mapper for training sessions and computed session dates.
pub struct SessionMapper;

impl SessionMapper {
    pub fn to_dto(domain: DomainSession) -> SharedSession {
        SharedSession {
            id: domain.id,
            lead_id: domain.lead_id,
            student_name: domain.student_name,
            format: domain.format,
            weekday: domain.weekday.map(weekday_name),
            start_date: domain.start.format(DATE_TIME_FORMAT).to_string(),
            end_date: domain.end.format(DATE_TIME_FORMAT).to_string(),
            dates: format_dates(&domain.dates),
            location: domain.location,
            notes: domain.notes,
            created_at: domain.created_at.to_rfc3339(),
        }
    }

    pub fn to_response(domain: DomainSession, success_message: &str) -> TrainingSessionResponse {
        TrainingSessionResponse {
            session: Self::to_dto(domain),
            success_message: success_message.to_string(),
        }
    }

    pub fn to_list_dto(domain_sessions: Vec<DomainSession>) -> TrainingSessionListResponse {
        TrainingSessionListResponse {
            sessions: domain_sessions.into_iter().map(Self::to_dto).collect(),
        }
    }

    pub fn to_dates_dto(dates: SessionDates) -> SessionDatesResponse {
        SessionDatesResponse {
            start_date: dates.start.format(DATE_TIME_FORMAT).to_string(),
            end_date: dates.end.format(DATE_TIME_FORMAT).to_string(),
            dates: format_dates(&dates.occurrences),
        }
    }
}

fn format_dates(dates: &[NaiveDate]) -> Vec<String> {
    dates
        .iter()
        .map(|date| date.format(DATE_FORMAT).to_string())
        .collect()
}

fn weekday_name(weekday: Weekday) -> String {
    match weekday {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
    .to_string()
}
