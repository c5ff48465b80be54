use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::pipeline::structured::deserialize_label;

/// Classified purpose of a user's input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Diagnosis,
    Treatment,
    Monitoring,
    Reporting,
    Emergency,
    General,
}

impl Intent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Diagnosis => "diagnosis",
            Self::Treatment => "treatment",
            Self::Monitoring => "monitoring",
            Self::Reporting => "reporting",
            Self::Emergency => "emergency",
            Self::General => "general",
        }
    }

    /// Case-insensitive inverse of `as_str`.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "diagnosis" => Some(Self::Diagnosis),
            "treatment" => Some(Self::Treatment),
            "monitoring" => Some(Self::Monitoring),
            "reporting" => Some(Self::Reporting),
            "emergency" => Some(Self::Emergency),
            "general" => Some(Self::General),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for Intent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_label(deserializer, Self::from_str, "an intent label")
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Medium,
    High,
    Emergency,
}

impl Urgency {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Emergency => "emergency",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "emergency" => Some(Self::Emergency),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for Urgency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_label(deserializer, Self::from_str, "an urgency level")
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured intent derived from one piece of free text.
///
/// Either fully parsed from model output or fully heuristic; never a mix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentRecord {
    pub intent: Intent,
    pub urgency: Urgency,
    pub specialists: Vec<String>,
    pub data_needed: Vec<String>,
    pub workflow_steps: Vec<String>,
}
