use std::path::Path;

use chrono::{Local, NaiveDateTime, Timelike};
use rusqlite::{params, Connection};

use super::types::{Vitals, VitalsRecord};
use super::{HistoryError, VitalsHistory};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS vitals_history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    patient_id TEXT NOT NULL,
    recorded_at TEXT NOT NULL,
    heart_rate REAL,
    temperature REAL,
    blood_pressure TEXT
);
CREATE INDEX IF NOT EXISTS idx_vitals_history_patient ON vitals_history(patient_id);";

/// SQLite-backed vitals history.
pub struct SqliteVitalsStore {
    conn: Connection,
}

impl SqliteVitalsStore {
    /// Open (or create) the history database at `path`.
    pub fn open(path: &Path) -> Result<Self, HistoryError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self, HistoryError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, HistoryError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Insert with an explicit timestamp.
    pub fn record_at(
        &self,
        patient_id: &str,
        vitals: &Vitals,
        recorded_at: NaiveDateTime,
    ) -> Result<VitalsRecord, HistoryError> {
        if patient_id.trim().is_empty() {
            return Err(HistoryError::InvalidRecord("empty patient id".into()));
        }
        if vitals.is_empty() {
            return Err(HistoryError::InvalidRecord("no measurements".into()));
        }
        self.conn.execute(
            "INSERT INTO vitals_history (patient_id, recorded_at, heart_rate, temperature, blood_pressure)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                patient_id,
                recorded_at.format(TIMESTAMP_FORMAT).to_string(),
                vitals.heart_rate,
                vitals.temperature,
                vitals.blood_pressure,
            ],
        )?;
        tracing::debug!("Vitals recorded");
        Ok(VitalsRecord {
            patient_id: patient_id.to_string(),
            recorded_at,
            vitals: vitals.clone(),
        })
    }
}

impl VitalsHistory for SqliteVitalsStore {
    fn record(&self, patient_id: &str, vitals: &Vitals) -> Result<VitalsRecord, HistoryError> {
        // Second precision matches the stored format.
        let now = Local::now().naive_local();
        let now = now.with_nanosecond(0).unwrap_or(now);
        self.record_at(patient_id, vitals, now)
    }

    fn records_for(&self, patient_id: &str) -> Result<Vec<VitalsRecord>, HistoryError> {
        let mut stmt = self.conn.prepare(
            "SELECT patient_id, recorded_at, heart_rate, temperature, blood_pressure
             FROM vitals_history
             WHERE patient_id = ?1
             ORDER BY id ASC",
        )?;
        let rows = stmt.query_map(params![patient_id], row_to_record)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(HistoryError::from)
    }
}

fn row_to_record(row: &rusqlite::Row) -> Result<VitalsRecord, rusqlite::Error> {
    let recorded_str: String = row.get(1)?;
    Ok(VitalsRecord {
        patient_id: row.get(0)?,
        recorded_at: NaiveDateTime::parse_from_str(&recorded_str, TIMESTAMP_FORMAT).map_err(
            |e| rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e)),
        )?,
        vitals: Vitals {
            heart_rate: row.get(2)?,
            temperature: row.get(3)?,
            blood_pressure: row.get(4)?,
        },
    })
}
