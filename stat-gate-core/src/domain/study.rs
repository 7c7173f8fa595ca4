use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{EngineError, Result};

// ===== Study Design =====

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StudyDesign {
    Independent,
    Paired,
    RepeatedMeasures,
}

impl StudyDesign {
    /// Paired and repeated designs violate the independence assumption
    /// unless the selected test family explicitly models the dependence.
    pub fn is_dependent(&self) -> bool {
        matches!(self, StudyDesign::Paired | StudyDesign::RepeatedMeasures)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeType {
    Continuous,
    Categorical,
}

// ===== Study Metadata =====

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StudyMetadata {
    pub title: String,
    pub study_design: StudyDesign,
    pub outcome_type: OutcomeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub research_id: Option<String>,
    #[serde(default)]
    pub extra: HashMap<String, String>,
}

impl StudyMetadata {
    pub fn new(title: impl Into<String>, design: StudyDesign, outcome: OutcomeType) -> Self {
        Self {
            title: title.into(),
            study_design: design,
            outcome_type: outcome,
            research_id: None,
            extra: HashMap::new(),
        }
    }
}

// ===== Study Data =====

/// One group's valid observations for a single outcome variable.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSample {
    pub group: String,
    pub values: Vec<f64>,
}

/// Raw study input: one group label per observation, outcome sequences
/// aligned by index. Missing values are encoded as NaN and are excluded
/// from every computation rather than propagated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyData {
    pub groups: Vec<String>,
    pub outcomes: HashMap<String, Vec<f64>>,
    #[serde(default)]
    pub covariates: HashMap<String, Vec<f64>>,
    pub metadata: StudyMetadata,
}

impl StudyData {
    pub fn new(
        groups: Vec<String>,
        outcomes: HashMap<String, Vec<f64>>,
        metadata: StudyMetadata,
    ) -> Self {
        Self {
            groups,
            outcomes,
            covariates: HashMap::new(),
            metadata,
        }
    }

    /// Check the alignment invariants: every outcome and covariate sequence
    /// must have one value per group label, and at least one observation
    /// must be present.
    pub fn validate(&self) -> Result<()> {
        if self.groups.is_empty() {
            return Err(EngineError::Validation(
                "study contains no observations".to_string(),
            ));
        }
        if self.outcomes.is_empty() {
            return Err(EngineError::Validation(
                "study contains no outcome variables".to_string(),
            ));
        }
        for (name, values) in &self.outcomes {
            if values.len() != self.groups.len() {
                return Err(EngineError::Validation(format!(
                    "outcome '{}' has {} values but {} group labels",
                    name,
                    values.len(),
                    self.groups.len()
                )));
            }
        }
        for (name, values) in &self.covariates {
            if values.len() != self.groups.len() {
                return Err(EngineError::Validation(format!(
                    "covariate '{}' has {} values but {} group labels",
                    name,
                    values.len(),
                    self.groups.len()
                )));
            }
        }
        Ok(())
    }

    /// Distinct group labels in order of first appearance.
    pub fn group_labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = Vec::new();
        for g in &self.groups {
            if !labels.contains(g) {
                labels.push(g.clone());
            }
        }
        labels
    }

    pub fn group_count(&self) -> usize {
        self.group_labels().len()
    }

    /// Per-group samples for one outcome variable, NaN values dropped,
    /// groups in first-appearance order.
    pub fn samples_for(&self, variable: &str) -> Result<Vec<GroupSample>> {
        let values = self.outcomes.get(variable).ok_or_else(|| {
            EngineError::Validation(format!("unknown outcome variable '{}'", variable))
        })?;

        let labels = self.group_labels();
        let mut samples: Vec<GroupSample> = labels
            .iter()
            .map(|g| GroupSample {
                group: g.clone(),
                values: Vec::new(),
            })
            .collect();

        for (label, &value) in self.groups.iter().zip(values.iter()) {
            if value.is_nan() {
                continue;
            }
            if let Some(sample) = samples.iter_mut().find(|s| &s.group == label) {
                sample.values.push(value);
            }
        }

        Ok(samples)
    }
}
