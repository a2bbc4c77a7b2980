//! Training session date calculation.
//!
//! Maps a training format, an optional weekday and an operator-chosen anchor
//! date to the session's bounding timestamps and its list of training days.
//! Everything here works on naive calendar dates: there is no time zone, so a
//! DST transition can never shift a computed day of the week.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, Weekday};
use shared::TrainingFormat;

/// Sessions open at 09:00 on their first day
pub const SESSION_START_HOUR: u32 = 9;
/// Sessions close at 17:00 on their last day
pub const SESSION_END_HOUR: u32 = 17;
/// Monthly sessions run on four consecutive weekends
pub const MONTHLY_OCCURRENCES: u64 = 4;

const WEEKLY_DAYS: u64 = 5;
const FAST_TRACK_DAYS: u64 = 2;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionDateError {
    #[error("Invalid weekday for monthly format: {0} (expected saturday or sunday)")]
    InvalidWeekday(String),

    #[error("Session dates fall outside the supported calendar range")]
    OutOfRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDates {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Every training day, first to last
    pub occurrences: Vec<NaiveDate>,
}

/// Compute the bounding dates of a session.
///
/// * weekly: Monday 09:00 to Friday 17:00 of the week containing `anchor`
///   (a Sunday anchor belongs to the week that started six days earlier).
/// * monthly: four dates seven days apart, starting at the first `weekday` on
///   or after `anchor`. The later dates may land in the following month.
/// * fast-track: `anchor` 09:00 to the next day 17:00.
///
/// `weekday` is only read for monthly format and must name Saturday or Sunday.
pub fn compute_session_dates(
    format: TrainingFormat,
    weekday: Option<&str>,
    anchor: NaiveDate,
) -> Result<SessionDates, SessionDateError> {
    let occurrences = match format {
        TrainingFormat::Weekly => weekly_days(anchor)?,
        TrainingFormat::Monthly => {
            let weekday = parse_weekend_day(weekday)?;
            monthly_occurrences(weekday, anchor)?
        }
        TrainingFormat::FastTrack => consecutive_days(anchor, FAST_TRACK_DAYS)?,
    };

    let (first, last) = match (occurrences.first(), occurrences.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return Err(SessionDateError::OutOfRange),
    };

    Ok(SessionDates {
        start: at_hour(first, SESSION_START_HOUR)?,
        end: at_hour(last, SESSION_END_HOUR)?,
        occurrences,
    })
}

/// Parse a weekday accepted by the monthly format.
///
/// Accepts chrono's English spellings ("sat", "Saturday", "SUN", ...).
/// Missing, unparsable and weekday values all map to `InvalidWeekday`.
pub fn parse_weekend_day(weekday: Option<&str>) -> Result<Weekday, SessionDateError> {
    let raw = weekday
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| SessionDateError::InvalidWeekday("<missing>".to_string()))?;

    match raw.parse::<Weekday>() {
        Ok(day @ (Weekday::Sat | Weekday::Sun)) => Ok(day),
        _ => Err(SessionDateError::InvalidWeekday(raw.to_string())),
    }
}

/// The four monthly dates: first `weekday` on or after `anchor`, then +7 days three times.
pub fn monthly_occurrences(
    weekday: Weekday,
    anchor: NaiveDate,
) -> Result<Vec<NaiveDate>, SessionDateError> {
    if !matches!(weekday, Weekday::Sat | Weekday::Sun) {
        return Err(SessionDateError::InvalidWeekday(weekday.to_string()));
    }

    let offset = (7 + weekday.num_days_from_monday() - anchor.weekday().num_days_from_monday()) % 7;
    let first = add_days(anchor, u64::from(offset))?;

    (0..MONTHLY_OCCURRENCES)
        .map(|week| add_days(first, week * 7))
        .collect()
}

/// Monday of the ISO week containing `date`
pub fn week_monday(date: NaiveDate) -> Result<NaiveDate, SessionDateError> {
    let back = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(back))
        .ok_or(SessionDateError::OutOfRange)
}

fn weekly_days(anchor: NaiveDate) -> Result<Vec<NaiveDate>, SessionDateError> {
    let days = consecutive_days(week_monday(anchor)?, WEEKLY_DAYS)?;
    debug_assert_eq!(days.first().map(|d| d.weekday()), Some(Weekday::Mon));
    debug_assert_eq!(days.last().map(|d| d.weekday()), Some(Weekday::Fri));
    Ok(days)
}

fn consecutive_days(first: NaiveDate, count: u64) -> Result<Vec<NaiveDate>, SessionDateError> {
    (0..count).map(|offset| add_days(first, offset)).collect()
}

fn add_days(date: NaiveDate, days: u64) -> Result<NaiveDate, SessionDateError> {
    date.checked_add_days(Days::new(days))
        .ok_or(SessionDateError::OutOfRange)
}

fn at_hour(date: NaiveDate, hour: u32) -> Result<NaiveDateTime, SessionDateError> {
    date.and_hms_opt(hour, 0, 0)
        .ok_or(SessionDateError::OutOfRange)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn datetime(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    #[test]
    fn test_weekly_from_wednesday() {
        let dates = compute_session_dates(TrainingFormat::Weekly, None, date("2025-06-11")).unwrap();

        assert_eq!(dates.start, datetime("2025-06-09T09:00:00"));
        assert_eq!(dates.end, datetime("2025-06-13T17:00:00"));
        assert_eq!(dates.occurrences.len(), 5);
    }

    #[test]
    fn test_weekly_sunday_anchor_rolls_back_to_previous_monday() {
        let dates = compute_session_dates(TrainingFormat::Weekly, None, date("2025-06-15")).unwrap();

        assert_eq!(dates.start, datetime("2025-06-09T09:00:00"));
        assert_eq!(dates.end, datetime("2025-06-13T17:00:00"));
    }

    #[test]
    fn test_weekly_monday_anchor_is_its_own_start() {
        let dates = compute_session_dates(TrainingFormat::Weekly, None, date("2025-06-09")).unwrap();
        assert_eq!(dates.start.date(), date("2025-06-09"));
    }

    #[test]
    fn test_weekly_ignores_weekday() {
        let with = compute_session_dates(TrainingFormat::Weekly, Some("lundi"), date("2025-06-11")).unwrap();
        let without = compute_session_dates(TrainingFormat::Weekly, None, date("2025-06-11")).unwrap();
        assert_eq!(with, without);
    }

    #[test]
    fn test_weekly_always_monday_to_friday_near_anchor() {
        let mut anchor = date("2024-12-20");
        for _ in 0..120 {
            let dates = compute_session_dates(TrainingFormat::Weekly, None, anchor).unwrap();

            assert_eq!(dates.start.weekday(), Weekday::Mon);
            assert_eq!(dates.end.weekday(), Weekday::Fri);
            assert_eq!(dates.end.date() - dates.start.date(), Duration::days(4));
            assert!((anchor - dates.start.date()).num_days().abs() <= 6);
            assert!((dates.end.date() - anchor).num_days().abs() <= 6);

            anchor = anchor.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_weekly_across_dst_changes() {
        // EU clocks change on these Sundays
        let spring = compute_session_dates(TrainingFormat::Weekly, None, date("2025-03-30")).unwrap();
        assert_eq!(spring.start, datetime("2025-03-24T09:00:00"));
        assert_eq!(spring.end, datetime("2025-03-28T17:00:00"));

        let autumn = compute_session_dates(TrainingFormat::Weekly, None, date("2025-10-26")).unwrap();
        assert_eq!(autumn.start, datetime("2025-10-20T09:00:00"));
        assert_eq!(autumn.end, datetime("2025-10-24T17:00:00"));
    }

    #[test]
    fn test_weekly_across_year_boundary() {
        let dates = compute_session_dates(TrainingFormat::Weekly, None, date("2025-01-01")).unwrap();
        assert_eq!(dates.start, datetime("2024-12-30T09:00:00"));
        assert_eq!(dates.end, datetime("2025-01-03T17:00:00"));
    }

    #[test]
    fn test_monthly_saturday_from_wednesday() {
        let dates = compute_session_dates(TrainingFormat::Monthly, Some("sat"), date("2025-06-11")).unwrap();

        assert_eq!(
            dates.occurrences,
            vec![date("2025-06-14"), date("2025-06-21"), date("2025-06-28"), date("2025-07-05")]
        );
        assert_eq!(dates.start, datetime("2025-06-14T09:00:00"));
        // Fourth occurrence spills into the next month
        assert_eq!(dates.end, datetime("2025-07-05T17:00:00"));

        for pair in dates.occurrences.windows(2) {
            assert_eq!(pair[1] - pair[0], Duration::days(7));
        }
    }

    #[test]
    fn test_monthly_anchor_on_matching_day_is_included() {
        let dates = compute_session_dates(TrainingFormat::Monthly, Some("Saturday"), date("2025-06-14")).unwrap();
        assert_eq!(dates.occurrences[0], date("2025-06-14"));
    }

    #[test]
    fn test_monthly_sunday() {
        let dates = compute_session_dates(TrainingFormat::Monthly, Some("SUN"), date("2025-06-11")).unwrap();

        assert_eq!(dates.occurrences[0], date("2025-06-15"));
        assert_eq!(dates.occurrences[3], date("2025-07-06"));
        assert!(dates.occurrences.iter().all(|d| d.weekday() == Weekday::Sun));
    }

    #[test]
    fn test_monthly_rejects_non_weekend_days() {
        for weekday in ["lundi", "mon", "friday", "", "  "] {
            let result = compute_session_dates(TrainingFormat::Monthly, Some(weekday), date("2025-06-11"));
            assert!(
                matches!(result, Err(SessionDateError::InvalidWeekday(_))),
                "expected InvalidWeekday for {:?}",
                weekday
            );
        }
    }

    #[test]
    fn test_monthly_requires_weekday() {
        let result = compute_session_dates(TrainingFormat::Monthly, None, date("2025-06-11"));
        assert_eq!(result, Err(SessionDateError::InvalidWeekday("<missing>".to_string())));
    }

    #[test]
    fn test_monthly_occurrences_rejects_weekday_directly() {
        assert!(monthly_occurrences(Weekday::Wed, date("2025-06-11")).is_err());
    }

    #[test]
    fn test_fast_track_spans_two_days() {
        let dates = compute_session_dates(TrainingFormat::FastTrack, None, date("2025-06-30")).unwrap();

        assert_eq!(dates.start, datetime("2025-06-30T09:00:00"));
        assert_eq!(dates.end, datetime("2025-07-01T17:00:00"));
        assert_eq!(dates.end - dates.start, Duration::days(1) + Duration::hours(8));
        assert_eq!(dates.occurrences, vec![date("2025-06-30"), date("2025-07-01")]);
    }

    #[test]
    fn test_same_input_same_output() {
        let anchor = date("2025-02-26");
        for format in [TrainingFormat::Weekly, TrainingFormat::Monthly, TrainingFormat::FastTrack] {
            let first = compute_session_dates(format, Some("sun"), anchor);
            let second = compute_session_dates(format, Some("sun"), anchor);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_end_of_calendar_is_out_of_range() {
        let result = compute_session_dates(TrainingFormat::FastTrack, None, NaiveDate::MAX);
        assert_eq!(result, Err(SessionDateError::OutOfRange));
    }
}
