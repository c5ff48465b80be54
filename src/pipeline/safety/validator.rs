use super::types::{SafetyPolicy, SafetyVerdict};
use crate::pipeline::inference::SharedClient;
use crate::pipeline::prompt_templates::safety_prompt;
use crate::pipeline::structured::parse_or_fallback;

/// Safety gate applied to every treatment plan before release.
pub struct SafetyValidator {
    client: SharedClient,
    policy: SafetyPolicy,
}

impl SafetyValidator {
    pub fn new(client: SharedClient) -> Self {
        Self::with_policy(client, SafetyPolicy::default())
    }

    pub fn with_policy(client: SharedClient, policy: SafetyPolicy) -> Self {
        Self { client, policy }
    }

    pub fn policy(&self) -> SafetyPolicy {
        self.policy
    }

    /// Never fails. An unusable assessment yields the policy's fallback verdict.
    pub fn validate(&self, symptoms: &str, diagnosis: &str, treatment: &str) -> SafetyVerdict {
        let reply = self
            .client
            .submit(&safety_prompt(symptoms, diagnosis, treatment));
        let policy = self.policy;
        let verdict = parse_or_fallback("safety_validation", reply, || {
            if policy == SafetyPolicy::FailOpen {
                tracing::warn!("Safety verdict unavailable, assuming safe (fail-open policy)");
            }
            policy.fallback_verdict()
        });
        log_verdict(&verdict);
        verdict
    }
}

/// Log a verdict WITHOUT the warning text.
fn log_verdict(verdict: &SafetyVerdict) {
    if verdict.safe {
        tracing::info!(risk_level = %verdict.risk_level, "Safety validation: safe");
    } else {
        tracing::warn!(
            risk_level = %verdict.risk_level,
            warning_len = verdict.warning.len(),
            "Safety validation: unsafe"
        );
    }
}
