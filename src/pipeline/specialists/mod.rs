pub mod types;
pub mod prompts;
pub mod router;
pub mod registry;

pub use types::*;
pub use router::*;
pub use registry::*;

use thiserror::Error;

use crate::pipeline::inference::InferenceError;

#[derive(Error, Debug)]
pub enum SpecialistError {
    #[error("No specialist registered for {0}")]
    NotRegistered(Specialty),

    #[error("Specialist inference failed: {0}")]
    Inference(#[from] InferenceError),
}
