use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::assumptions::AssumptionCheckResult;
use crate::domain::hypothesis::TestFamily;
use crate::domain::study::StudyMetadata;
use crate::error::Result;

/// A test-family hypothesis produced by the planning capability.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalysisStrategy {
    pub family: TestFamily,
    /// Force the rank-based procedure even if assumptions would allow the
    /// parametric one. Set by re-planning after a failed quality gate.
    pub prefer_nonparametric: bool,
}

impl AnalysisStrategy {
    pub fn new(family: TestFamily) -> Self {
        Self {
            family,
            prefer_nonparametric: false,
        }
    }
}

/// The planning capability used by the orchestrator's PLANNING and
/// REPLANNING states. Production wiring may put an LLM-backed planner
/// behind this seam; implementations must be deterministic for identical
/// inputs so the pipeline stays testable.
#[async_trait]
pub trait StrategySelector: Send + Sync {
    /// Select a strategy from study metadata and group count. On re-plan,
    /// `prior` carries the assumption outcomes of the previous attempt.
    async fn select(
        &self,
        metadata: &StudyMetadata,
        group_count: usize,
        prior: Option<&AssumptionCheckResult>,
    ) -> Result<AnalysisStrategy>;
}
