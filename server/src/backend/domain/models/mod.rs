pub mod accounting_entry;
pub mod lead;
pub mod training_session;

pub use accounting_entry::{AccountingEntry, EntryField};
pub use lead::{Lead, LeadValidationError};
pub use training_session::TrainingSession;
