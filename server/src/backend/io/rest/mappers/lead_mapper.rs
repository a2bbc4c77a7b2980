use crate::backend::domain::models::Lead as DomainLead;
use shared::{Lead as SharedLead, LeadListResponse, LeadResponse};

/// Mapper to convert domain Lead models into shared Lead DTOs.
pub struct LeadMapper;

impl LeadMapper {
    pub fn to_dto(domain: DomainLead) -> SharedLead {
        SharedLead {
            id: domain.id,
            first_name: domain.first_name,
            last_name: domain.last_name,
            email: domain.email,
            phone: domain.phone,
            instrument: domain.instrument,
            status: domain.status,
            fixed_price: domain.fixed_price,
            closer: domain.closer,
            notes: domain.notes,
            created_at: domain.created_at.to_rfc3339(),
            updated_at: domain.updated_at.to_rfc3339(),
        }
    }

    pub fn to_response(domain: DomainLead, success_message: &str) -> LeadResponse {
        LeadResponse {
            lead: Self::to_dto(domain),
            success_message: success_message.to_string(),
        }
    }

    pub fn to_list_dto(domain_leads: Vec<DomainLead>) -> LeadListResponse {
        LeadListResponse {
            leads: domain_leads.into_iter().map(Self::to_dto).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;
    use shared::LeadStatus;

    #[test]
    fn test_to_dto_formats_timestamps() {
        let created = Utc.with_ymd_and_hms(2025, 6, 12, 9, 30, 0).unwrap();
        let domain = DomainLead {
            id: "lead::1".to_string(),
            first_name: "Camille".to_string(),
            last_name: "Martin".to_string(),
            email: None,
            phone: None,
            instrument: Some("Violin".to_string()),
            status: LeadStatus::Closing,
            fixed_price: Some(dec!(990)),
            closer: None,
            notes: None,
            created_at: created,
            updated_at: created,
        };

        let dto = LeadMapper::to_dto(domain);
        assert_eq!(dto.created_at, "2025-06-12T09:30:00+00:00");
        assert_eq!(dto.status, LeadStatus::Closing);
        assert_eq!(dto.fixed_price, Some(dec!(990)));
    }
}
