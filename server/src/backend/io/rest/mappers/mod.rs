//! Conversions from domain models to the shared REST DTOs.

pub mod accounting_mapper;
pub mod lead_mapper;
pub mod session_mapper;

pub use accounting_mapper::AccountingMapper;
pub use lead_mapper::LeadMapper;
pub use session_mapper::SessionMapper;

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";
pub(crate) const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
