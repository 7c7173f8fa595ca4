use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::assumptions::AssumptionCheckResult;
use super::descriptive::DescriptiveStats;
use super::effect::EffectSize;
use super::figure::FigureSpec;
use super::hypothesis::HypothesisTestResult;

/// The aggregate output of one analysis request.
///
/// Constructed fresh per request by the orchestrator and immutable once
/// returned; downstream consumers only read it. Callers must check
/// `quality_gate_exhausted` before treating a result as
/// publication-ready.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticalResult {
    pub id: Uuid,
    pub variable: String,
    pub descriptives: Vec<DescriptiveStats>,
    pub hypothesis_test: HypothesisTestResult,
    pub effect_size: EffectSize,
    pub assumptions: AssumptionCheckResult,
    pub figures: Vec<FigureSpec>,
    /// Standardized textual report consumed by the narrative generator.
    pub report: String,
    /// Composite quality score in [0, 1].
    pub quality_score: f64,
    /// True when the iteration budget was spent without reaching the
    /// acceptance threshold; the best attempt is still returned.
    pub quality_gate_exhausted: bool,
    /// Number of quality gate attempts consumed (1-based).
    pub attempts: u32,
    pub created_at: DateTime<Utc>,
}

impl StatisticalResult {
    /// Whether the package can be used for publication-grade output
    /// without human review.
    pub fn publication_ready(&self, threshold: f64) -> bool {
        !self.quality_gate_exhausted && self.quality_score >= threshold
    }
}
