use serde::{Deserialize, Serialize};

use super::hypothesis::TestProcedure;

/// Outcome of a single assumption check.
///
/// `NotTestable` marks groups too small (or too degenerate) for the test
/// to be informative; it never triggers remediation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Passed,
    Failed,
    NotTestable,
}

impl CheckStatus {
    pub fn failed(&self) -> bool {
        matches!(self, CheckStatus::Failed)
    }
}

/// Per-group distribution-shape check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NormalityCheck {
    pub group: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistic: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p_value: Option<f64>,
    pub status: CheckStatus,
}

/// Joint variance-equality check across all groups.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HomogeneityCheck {
    pub statistic: f64,
    pub p_value: f64,
    pub passed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssumptionCheckResult {
    pub normality: Vec<NormalityCheck>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homogeneity: Option<HomogeneityCheck>,
    /// Design-based, not data-tested.
    pub independence_passed: bool,
    pub remediation_suggestions: Vec<String>,
    pub alternative_tests: Vec<TestProcedure>,
}

impl AssumptionCheckResult {
    pub fn normality_failed(&self) -> bool {
        self.normality.iter().any(|c| c.status.failed())
    }

    pub fn homogeneity_failed(&self) -> bool {
        self.homogeneity.as_ref().is_some_and(|h| !h.passed)
    }

    pub fn any_failed(&self) -> bool {
        self.normality_failed() || self.homogeneity_failed()
    }
}
