mod errors;
mod persistence;
mod types;
mod validation;

pub use errors::SessionError;
pub use persistence::{SavedSession, SessionStore};
pub use types::{SessionConfig, SessionListing, SessionSummary, WindowRecord, dedup_by_process};
pub use validation::validate_session_name;
