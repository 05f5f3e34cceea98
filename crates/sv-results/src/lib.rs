//! sv-results: persisted exploration studies.

pub mod hash;
pub mod schema;
pub mod store;

pub use hash::compute_study_id;
pub use schema::{CaseRecord, SCHEMA_VERSION, StudyManifest};
pub use store::StudyStore;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Study not found: {study_id}")]
    StudyNotFound { study_id: String },

    #[error("Unsupported schema version {found} (expected {expected})")]
    SchemaMismatch { found: u32, expected: u32 },
}
