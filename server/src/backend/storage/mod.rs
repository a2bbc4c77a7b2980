//! # Storage Module
//!
//! Persistence for leads, accounting entries and training sessions.
//!
//! The domain layer only sees the traits in [`traits`]; the SQLite connection
//! and its repositories implement them. The pipeline report cache lives here
//! too, as an injected capability rather than a global.

pub mod connection;
pub mod report_cache;
pub mod repositories;
pub mod traits;

// Re-export the main types that other modules need
pub use connection::DbConnection;
pub use report_cache::{InMemoryReportCache, ReportCache};
pub use repositories::{AccountingRepository, LeadRepository, SessionRepository};
pub use traits::{AccountingStorage, Connection, LeadStorage, SessionStorage};
