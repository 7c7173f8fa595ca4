//! Quality-gated analysis orchestrator.
//!
//! One `analyze` call runs the full pipeline: plan, check assumptions,
//! execute, format, score. When the composite score misses the
//! threshold the engine re-plans and retries within a fixed attempt
//! budget; the best-scoring attempt is always returned, flagged as
//! exhausted when the gate never passed.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use stat_gate_core::{
    AnalysisStrategy, EngineError, Result, StatisticalResult, StrategySelector, StudyData,
};
use stat_gate_stats::{assumptions, descriptive, dispatch, effect};

use crate::formatter;
use crate::planner::RuleBasedPlanner;
use crate::scoring::{self, QUALITY_THRESHOLD};

#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    pub quality_threshold: f64,
    pub max_attempts: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            quality_threshold: QUALITY_THRESHOLD,
            max_attempts: 3,
        }
    }
}

/// Pipeline states, used for transition logging and the legality check
/// in `advance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    Planning,
    CheckingAssumptions,
    Executing,
    Scoring,
    Replanning,
    Complete,
    Exhausted,
}

impl EnginePhase {
    pub fn can_transition_to(self, next: EnginePhase) -> bool {
        use EnginePhase::*;
        matches!(
            (self, next),
            (Planning, CheckingAssumptions)
                | (CheckingAssumptions, Executing)
                | (Executing, Scoring)
                | (Scoring, Complete)
                | (Scoring, Replanning)
                | (Scoring, Exhausted)
                | (Replanning, CheckingAssumptions)
                | (Replanning, Exhausted)
        )
    }
}

struct Attempt {
    strategy: AnalysisStrategy,
    result: StatisticalResult,
}

pub struct AnalysisEngine {
    planner: Arc<dyn StrategySelector>,
    config: EngineConfig,
}

impl Default for AnalysisEngine {
    fn default() -> Self {
        Self::new(Arc::new(RuleBasedPlanner::new()), EngineConfig::default())
    }
}

impl AnalysisEngine {
    pub fn new(planner: Arc<dyn StrategySelector>, config: EngineConfig) -> Self {
        Self { planner, config }
    }

    /// Run the quality-gated pipeline for one outcome variable.
    ///
    /// Fatal errors (insufficient data, unsupported design) abort
    /// immediately without consuming gate attempts. Everything else is
    /// returned as data on the result.
    pub async fn analyze(&self, study: &StudyData, variable: &str) -> Result<StatisticalResult> {
        study.validate()?;
        let descriptives = descriptive::summarize(study, variable)?;
        let samples = study.samples_for(variable)?;
        let group_count = samples.len();
        let metadata = &study.metadata;

        let mut phase = EnginePhase::Planning;
        let mut strategy = self.planner.select(metadata, group_count, None).await?;
        let mut best: Option<Attempt> = None;
        let mut attempts = 0u32;

        while attempts < self.config.max_attempts {
            attempts += 1;
            tracing::info!(attempt = attempts, family = ?strategy.family, "starting analysis attempt");

            phase = self.advance(phase, EnginePhase::CheckingAssumptions);
            let checks = assumptions::check(&samples, strategy.family, metadata.study_design);

            phase = self.advance(phase, EnginePhase::Executing);
            let test = dispatch::execute(&samples, &strategy, &checks)?;
            let effect_size = effect::for_family(strategy.family, &samples)?;

            let figures =
                formatter::build_figures(variable, &samples, &descriptives, metadata.outcome_type);
            let report = formatter::format_report(
                &metadata.title,
                variable,
                &descriptives,
                &test,
                &effect_size,
                &checks,
            );

            phase = self.advance(phase, EnginePhase::Scoring);
            let breakdown = scoring::score(&test, &effect_size, &checks, &report, &figures);
            let quality_score = breakdown.composite();

            let result = StatisticalResult {
                id: Uuid::new_v4(),
                variable: variable.to_string(),
                descriptives: descriptives.clone(),
                hypothesis_test: test,
                effect_size,
                assumptions: checks,
                figures,
                report,
                quality_score,
                quality_gate_exhausted: false,
                attempts,
                created_at: Utc::now(),
            };

            if quality_score >= self.config.quality_threshold {
                self.advance(phase, EnginePhase::Complete);
                tracing::info!(attempt = attempts, quality_score, "quality gate passed");
                return Ok(result);
            }

            let checks = result.assumptions.clone();
            if best
                .as_ref()
                .map_or(true, |b| result.quality_score > b.result.quality_score)
            {
                best = Some(Attempt { strategy, result });
            }

            if attempts >= self.config.max_attempts {
                break;
            }

            phase = self.advance(phase, EnginePhase::Replanning);
            let next = self
                .planner
                .select(metadata, group_count, Some(&checks))
                .await?;
            if next == strategy {
                // Re-planning produced no new information; further
                // attempts would repeat the same analysis.
                tracing::info!(attempt = attempts, "re-planning converged, stopping early");
                break;
            }
            strategy = next;
        }

        self.advance(phase, EnginePhase::Exhausted);
        let mut best = best
            .ok_or_else(|| EngineError::Internal("no analysis attempt produced a result".into()))?;
        tracing::warn!(
            attempts = best.result.attempts,
            quality_score = best.result.quality_score,
            family = ?best.strategy.family,
            "quality gate exhausted, returning best attempt"
        );
        best.result.quality_gate_exhausted = true;
        best.result.attempts = attempts;
        Ok(best.result)
    }

    fn advance(&self, from: EnginePhase, to: EnginePhase) -> EnginePhase {
        debug_assert!(from.can_transition_to(to), "{:?} -> {:?}", from, to);
        tracing::debug!(from = ?from, to = ?to, "phase transition");
        to
    }
}
