//! Domain-level query types shared by services and storage.
//! The REST layer maps query strings onto these before calling a service.

use chrono::{Datelike, NaiveDate};

use super::errors::DomainError;

/// A calendar month, half-open: `start <= date < end`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl MonthPeriod {
    /// Parse "YYYY-MM"
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let invalid = || DomainError::validation(format!("Invalid month (expected YYYY-MM): {}", value));

        let start = NaiveDate::parse_from_str(&format!("{}-01", value.trim()), "%Y-%m-%d")
            .map_err(|_| invalid())?;
        let end = if start.month() == 12 {
            NaiveDate::from_ymd_opt(start.year() + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(start.year(), start.month() + 1, 1)
        }
        .ok_or_else(invalid)?;

        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    pub fn label(&self) -> String {
        self.start.format("%Y-%m").to_string()
    }
}

/// Filter for listing accounting entries
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryListFilter {
    pub lead_id: Option<String>,
    /// Restricts on payment date
    pub period: Option<MonthPeriod>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_period_parse() {
        let june = MonthPeriod::parse("2025-06").unwrap();
        assert_eq!(june.start, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        assert_eq!(june.end, NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());
        assert_eq!(june.label(), "2025-06");
    }

    #[test]
    fn test_month_period_december_rolls_year() {
        let december = MonthPeriod::parse("2024-12").unwrap();
        assert_eq!(december.end, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    }

    #[test]
    fn test_month_period_contains_is_half_open() {
        let june = MonthPeriod::parse("2025-06").unwrap();
        assert!(june.contains(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()));
        assert!(june.contains(NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()));
        assert!(!june.contains(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()));
        assert!(!june.contains(NaiveDate::from_ymd_opt(2025, 5, 31).unwrap()));
    }

    #[test]
    fn test_month_period_rejects_garbage() {
        assert!(MonthPeriod::parse("2025-13").is_err());
        assert!(MonthPeriod::parse("June").is_err());
        assert!(MonthPeriod::parse("").is_err());
    }
}
