use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity attached to a safety verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// Lenient mapping of a model's label. Unrecognized labels map to
    /// `High` so an odd label never downgrades a flagged plan.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "low" | "minimal" | "none" => Self::Low,
            "medium" | "moderate" => Self::Medium,
            "critical" | "severe" => Self::Critical,
            _ => Self::High,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured outcome of validating a treatment plan for hazards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawVerdict")]
pub struct SafetyVerdict {
    pub safe: bool,
    /// Empty when safe.
    pub warning: String,
    pub risk_level: RiskLevel,
}

/// Verdict as the model writes it. Only `safe` is required.
#[derive(Deserialize)]
struct RawVerdict {
    safe: bool,
    #[serde(default)]
    warning: Option<String>,
    #[serde(default)]
    risk_level: Option<String>,
}

impl From<RawVerdict> for SafetyVerdict {
    fn from(raw: RawVerdict) -> Self {
        let risk_level = match raw.risk_level.as_deref() {
            Some(label) => RiskLevel::from_label(label),
            None if raw.safe => RiskLevel::Low,
            None => RiskLevel::High,
        };
        Self {
            safe: raw.safe,
            warning: raw.warning.unwrap_or_default().trim().to_string(),
            risk_level,
        }
    }
}

impl SafetyVerdict {
    /// "Assumed safe" verdict used by the fail-open policy.
    pub fn assumed_safe() -> Self {
        Self {
            safe: true,
            warning: String::new(),
            risk_level: RiskLevel::Low,
        }
    }

    /// Verdict used by the fail-closed policy when validation is unavailable.
    pub fn unverified() -> Self {
        Self {
            safe: false,
            warning: UNVERIFIED_WARNING.to_string(),
            risk_level: RiskLevel::High,
        }
    }
}

pub const UNVERIFIED_WARNING: &str =
    "Safety validation unavailable: this treatment plan could not be checked for hazards. \
     Review it with a clinician before acting on it.";

/// What the validator returns when the model's assessment is unusable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyPolicy {
    /// Treat "could not determine" as safe.
    #[default]
    FailOpen,
    /// Treat "could not determine" as unsafe with a visible warning.
    FailClosed,
}

impl SafetyPolicy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "fail_open" | "open" => Some(Self::FailOpen),
            "fail_closed" | "closed" => Some(Self::FailClosed),
            _ => None,
        }
    }

    pub fn fallback_verdict(self) -> SafetyVerdict {
        match self {
            Self::FailOpen => SafetyVerdict::assumed_safe(),
            Self::FailClosed => SafetyVerdict::unverified(),
        }
    }
}
