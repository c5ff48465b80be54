//! Patient vitals history consumed by the monitoring workflow.
//!
//! The workflow only needs `VitalsHistory`; chart rendering stays behind
//! `ChartRenderer` so the core never depends on a plotting backend.

pub mod types;
pub mod sqlite;
pub mod chart;

pub use types::*;
pub use sqlite::*;
pub use chart::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid vitals record: {0}")]
    InvalidRecord(String),
}

/// Store of timestamped vitals per patient.
pub trait VitalsHistory {
    /// Append one observation; returns the stored record.
    fn record(&self, patient_id: &str, vitals: &Vitals) -> Result<VitalsRecord, HistoryError>;

    /// All records for a patient, oldest first.
    fn records_for(&self, patient_id: &str) -> Result<Vec<VitalsRecord>, HistoryError>;
}
