//! Rule-based strategy planning.

use async_trait::async_trait;

use stat_gate_core::{
    AnalysisStrategy, AssumptionCheckResult, DesignSignature, EngineError, Result,
    StrategySelector, StudyMetadata,
};

/// Deterministic planner that maps the design signature onto a test
/// family. On re-plan after failed assumptions it commits to the
/// rank-based procedure up front instead of relying on substitution.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedPlanner;

impl RuleBasedPlanner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl StrategySelector for RuleBasedPlanner {
    async fn select(
        &self,
        metadata: &StudyMetadata,
        group_count: usize,
        prior: Option<&AssumptionCheckResult>,
    ) -> Result<AnalysisStrategy> {
        let signature =
            DesignSignature::from_study(group_count, metadata.study_design, metadata.outcome_type);
        let family = signature
            .family()
            .ok_or(EngineError::UnsupportedDesign {
                groups: group_count,
                design: metadata.study_design,
                outcome: metadata.outcome_type,
            })?;

        let mut strategy = AnalysisStrategy::new(family);
        if prior.is_some_and(|p| p.any_failed()) {
            strategy.prefer_nonparametric = true;
        }

        tracing::debug!(
            family = ?strategy.family,
            prefer_nonparametric = strategy.prefer_nonparametric,
            replan = prior.is_some(),
            "strategy selected"
        );
        Ok(strategy)
    }
}
