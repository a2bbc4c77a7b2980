//! # Domain Module
//!
//! Business logic for the music-training CRM, independent of HTTP and of the
//! storage backend.
//!
//! ## Module Organization
//!
//! - **session_dates**: pure calculator for training session start/end dates
//! - **payment_recompute**: pure commission and remaining-balance recomputation
//! - **lead_service**: lead capture and pipeline status
//! - **accounting_service**: payment entries, single-field edits, optimistic versioning
//! - **session_service**: scheduling training sessions from the date calculator
//! - **report_service**: pipeline report behind an injected cache
//!
//! ## Business Rules
//!
//! - Closer commission is 10% and formateur commission 5% of every payment
//! - A deposit's remaining balance is its total price minus the amount paid
//! - Recording a payment moves its lead forward (never backward, never out of `lost`)

pub mod accounting_service;
pub mod commands;
pub mod errors;
pub mod lead_service;
pub mod models;
pub mod payment_recompute;
pub mod report_service;
pub mod session_dates;
pub mod session_service;

pub use accounting_service::AccountingService;
pub use errors::DomainError;
pub use lead_service::LeadService;
pub use report_service::ReportService;
pub use session_service::SessionService;
