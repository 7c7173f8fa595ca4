use thiserror::Error;

use crate::domain::study::{OutcomeType, StudyDesign};

/// Errors surfaced by the analysis engine.
///
/// Only fatal conditions live here. Assumption violations and quality gate
/// exhaustion are recorded as data on the returned result, never raised.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Insufficient data: group '{group}' has no valid observations for variable '{variable}'")]
    InsufficientData { variable: String, group: String },

    #[error("Unsupported design: {groups} group(s), {design:?} design, {outcome:?} outcome has no matching test family")]
    UnsupportedDesign {
        groups: usize,
        design: StudyDesign,
        outcome: OutcomeType,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Planning error: {0}")]
    Planning(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl EngineError {
    /// Fatal errors abort the request and must not be retried by the
    /// quality gate, since retrying without new information cannot change
    /// the outcome.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            EngineError::InsufficientData { .. } | EngineError::UnsupportedDesign { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Serialization(err.to_string())
    }
}
