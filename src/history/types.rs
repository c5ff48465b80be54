use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One set of measurements as entered by the patient or a device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    pub heart_rate: Option<f64>,
    pub temperature: Option<f64>,
    /// Free text, e.g. "120/80".
    pub blood_pressure: Option<String>,
}

impl Vitals {
    pub fn is_empty(&self) -> bool {
        self.heart_rate.is_none() && self.temperature.is_none() && self.blood_pressure.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalsRecord {
    pub patient_id: String,
    pub recorded_at: NaiveDateTime,
    #[serde(flatten)]
    pub vitals: Vitals,
}

impl VitalsRecord {
    /// Compact single-line rendering for prompts.
    pub fn render(&self) -> String {
        let mut parts = vec![
            format!("patient_id: {}", self.patient_id),
            format!("timestamp: {}", self.recorded_at.format("%Y-%m-%d %H:%M")),
        ];
        if let Some(hr) = self.vitals.heart_rate {
            parts.push(format!("heart_rate: {hr}"));
        }
        if let Some(t) = self.vitals.temperature {
            parts.push(format!("temperature: {t}"));
        }
        if let Some(bp) = &self.vitals.blood_pressure {
            parts.push(format!("blood_pressure: {bp}"));
        }
        format!("{{{}}}", parts.join(", "))
    }
}

/// Render the last `n` records, oldest first, one per line.
pub fn render_recent(records: &[VitalsRecord], n: usize) -> String {
    let start = records.len().saturating_sub(n);
    records[start..]
        .iter()
        .map(VitalsRecord::render)
        .collect::<Vec<_>>()
        .join("\n")
}
