use std::collections::BTreeMap;

use serde::Serialize;

/// Appended to every workflow run that gets past triage.
pub const FOLLOW_UP_RECOMMENDATIONS: [&str; 3] = [
    "Consider follow-up in 24-48 hours",
    "Monitor for symptom changes",
    "Seek immediate care if symptoms worsen",
];

/// Ordered audit record of one workflow run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WorkflowLog {
    steps: Vec<String>,
    agents_consulted: Vec<String>,
    /// Placeholder; nothing populates it yet.
    confidence_scores: BTreeMap<String, f32>,
    recommendations: Vec<String>,
}

impl WorkflowLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_step(&mut self, step: impl Into<String>) {
        self.steps.push(step.into());
    }

    pub fn record_agent(&mut self, agent: impl Into<String>) {
        self.agents_consulted.push(agent.into());
    }

    pub fn add_recommendation(&mut self, recommendation: impl Into<String>) {
        self.recommendations.push(recommendation.into());
    }

    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    pub fn agents_consulted(&self) -> &[String] {
        &self.agents_consulted
    }

    pub fn confidence_scores(&self) -> &BTreeMap<String, f32> {
        &self.confidence_scores
    }

    pub fn recommendations(&self) -> &[String] {
        &self.recommendations
    }
}
