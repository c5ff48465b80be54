//! Consultation workflows: the staged diagnosis pipeline and the
//! monitoring summary, both driven by `WorkflowCoordinator`.

pub mod context;
pub mod log;
pub mod stages;
pub mod monitoring;
pub mod coordinator;

pub use context::*;
pub use log::*;
pub use stages::{DiagnosisOutcome, Stage};
pub use monitoring::MonitoringOutcome;
pub use coordinator::*;

use thiserror::Error;

use crate::history::HistoryError;
use crate::pipeline::inference::InferenceError;

#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("Generation failed at {stage}: {source}")]
    Generation {
        stage: &'static str,
        source: InferenceError,
    },

    #[error("History error: {0}")]
    History(#[from] HistoryError),
}

impl WorkflowError {
    pub fn generation(stage: &'static str) -> impl FnOnce(InferenceError) -> Self {
        move |source| Self::Generation { stage, source }
    }
}
