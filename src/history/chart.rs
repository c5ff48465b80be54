use super::types::VitalsRecord;

/// Renders a vitals trend chart and returns a reference to it (path, URL).
pub trait ChartRenderer {
    fn render(&self, patient_id: &str, records: &[VitalsRecord]) -> Option<String>;
}

/// Renderer for deployments without a charting backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoChart;

impl ChartRenderer for NoChart {
    fn render(&self, _patient_id: &str, _records: &[VitalsRecord]) -> Option<String> {
        None
    }
}
