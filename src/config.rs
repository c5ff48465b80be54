use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::pipeline::safety::SafetyPolicy;

/// Application-level constants
pub const APP_NAME: &str = "Medconsult";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
/// Model for diagnosis, treatment, specialist and safety prompts.
pub const DEFAULT_CLINICAL_MODEL: &str = "OussamaELALLAM/MedExpert";
/// Model for monitoring summaries and reports.
pub const DEFAULT_MONITORING_MODEL: &str = "potaTOES33/healthmateai";
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 500;

pub const ENV_OLLAMA_URL: &str = "MEDCONSULT_OLLAMA_URL";
pub const ENV_CLINICAL_MODEL: &str = "MEDCONSULT_CLINICAL_MODEL";
pub const ENV_MONITORING_MODEL: &str = "MEDCONSULT_MONITORING_MODEL";
pub const ENV_TIMEOUT_SECS: &str = "MEDCONSULT_TIMEOUT_SECS";
pub const ENV_MAX_RETRIES: &str = "MEDCONSULT_MAX_RETRIES";
pub const ENV_SAFETY_POLICY: &str = "MEDCONSULT_SAFETY_POLICY";
pub const ENV_HISTORY_DB: &str = "MEDCONSULT_HISTORY_DB";

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> &'static str {
    "medconsult=info,medconsult_lib=info"
}

/// Get the application data directory (~/Medconsult/)
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_NAME)
}

/// Default location of the vitals history database.
pub fn history_db_path() -> PathBuf {
    app_data_dir().join("history.db")
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Which kind of work a model is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelTask {
    Diagnosis,
    Treatment,
    Monitoring,
    Report,
}

/// Runtime configuration, resolved once at process start.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsultConfig {
    pub ollama_url: String,
    pub clinical_model: String,
    pub monitoring_model: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
    pub safety_policy: SafetyPolicy,
    pub history_db: PathBuf,
}

impl Default for ConsultConfig {
    fn default() -> Self {
        Self {
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            clinical_model: DEFAULT_CLINICAL_MODEL.to_string(),
            monitoring_model: DEFAULT_MONITORING_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: 0,
            retry_base_delay_ms: DEFAULT_RETRY_BASE_DELAY_MS,
            safety_policy: SafetyPolicy::default(),
            history_db: history_db_path(),
        }
    }
}

impl ConsultConfig {
    /// Defaults overridden by `MEDCONSULT_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each key.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_OLLAMA_URL) {
            config.ollama_url = url.trim().to_string();
        }
        if let Some(model) = get(ENV_CLINICAL_MODEL) {
            config.clinical_model = model.trim().to_string();
        }
        if let Some(model) = get(ENV_MONITORING_MODEL) {
            config.monitoring_model = model.trim().to_string();
        }
        if let Some(raw) = get(ENV_TIMEOUT_SECS) {
            config.timeout_secs = parse_number(ENV_TIMEOUT_SECS, &raw)?;
        }
        if let Some(raw) = get(ENV_MAX_RETRIES) {
            config.max_retries = parse_number(ENV_MAX_RETRIES, &raw)?;
        }
        if let Some(raw) = get(ENV_SAFETY_POLICY) {
            config.safety_policy =
                SafetyPolicy::from_str(&raw).ok_or(ConfigError::InvalidValue {
                    key: ENV_SAFETY_POLICY,
                    value: raw.clone(),
                })?;
        }
        if let Some(path) = get(ENV_HISTORY_DB) {
            config.history_db = PathBuf::from(path.trim());
        }

        Ok(config)
    }

    /// Model name serving `task`.
    pub fn model_for(&self, task: ModelTask) -> &str {
        match task {
            ModelTask::Diagnosis | ModelTask::Treatment => &self.clinical_model,
            ModelTask::Monitoring | ModelTask::Report => &self.monitoring_model,
        }
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
    })
}
