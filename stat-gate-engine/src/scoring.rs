//! Composite quality scoring for one analysis attempt.
//!
//! Each criterion scores in [0, 1]; the composite is a fixed weighted
//! sum. The weights total 1.0 so the composite also stays in [0, 1].

use serde::{Deserialize, Serialize};

use stat_gate_core::{
    AssumptionCheckResult, EffectSize, FigureSpec, HypothesisTestResult, TestProcedure,
};

/// Composite score at or above this value passes the quality gate.
pub const QUALITY_THRESHOLD: f64 = 0.85;

pub const WEIGHT_ASSUMPTIONS: f64 = 0.30;
pub const WEIGHT_VALIDITY: f64 = 0.20;
pub const WEIGHT_EFFECT: f64 = 0.20;
pub const WEIGHT_FORMATTING: f64 = 0.15;
pub const WEIGHT_INTERPRETATION: f64 = 0.15;

/// Per-criterion scores for one attempt, kept alongside the composite so
/// a failed gate can be diagnosed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QualityBreakdown {
    pub assumptions: f64,
    pub statistical_validity: f64,
    pub effect_size: f64,
    pub formatting: f64,
    pub interpretation: f64,
}

impl QualityBreakdown {
    pub fn composite(&self) -> f64 {
        self.assumptions * WEIGHT_ASSUMPTIONS
            + self.statistical_validity * WEIGHT_VALIDITY
            + self.effect_size * WEIGHT_EFFECT
            + self.formatting * WEIGHT_FORMATTING
            + self.interpretation * WEIGHT_INTERPRETATION
    }
}

/// Score one attempt across the five gate criteria.
pub fn score(
    test: &HypothesisTestResult,
    effect: &EffectSize,
    assumptions: &AssumptionCheckResult,
    report: &str,
    figures: &[FigureSpec],
) -> QualityBreakdown {
    let breakdown = QualityBreakdown {
        assumptions: score_assumptions(test, assumptions),
        statistical_validity: score_validity(test),
        effect_size: score_effect(effect),
        formatting: score_formatting(test, report, figures),
        interpretation: score_interpretation(test, effect),
    };
    tracing::debug!(
        composite = breakdown.composite(),
        assumptions = breakdown.assumptions,
        validity = breakdown.statistical_validity,
        effect = breakdown.effect_size,
        formatting = breakdown.formatting,
        interpretation = breakdown.interpretation,
        "attempt scored"
    );
    breakdown
}

/// Full credit when every testable assumption held, or when each failure
/// was addressed by the executed procedure. Unaddressed failures cost
/// half the criterion each.
fn score_assumptions(test: &HypothesisTestResult, assumptions: &AssumptionCheckResult) -> f64 {
    let mut s = 1.0_f64;

    if assumptions.normality_failed() && !addresses_normality(test.executed) {
        s -= 0.5;
    }
    if assumptions.homogeneity_failed()
        && !addresses_normality(test.executed)
        && !addresses_heteroscedasticity(test.executed)
    {
        s -= 0.5;
    }
    if !assumptions.independence_passed {
        s -= 0.5;
    }
    s.max(0.0)
}

fn addresses_normality(executed: TestProcedure) -> bool {
    !executed.is_parametric()
}

fn addresses_heteroscedasticity(executed: TestProcedure) -> bool {
    matches!(
        executed,
        TestProcedure::WelchT | TestProcedure::KruskalWallis
    )
}

/// Sanity of the reported numbers, in thirds: statistic finite, p-value
/// in [0, 1], degrees of freedom positive when reported.
fn score_validity(test: &HypothesisTestResult) -> f64 {
    let mut s = 0.0;
    if test.statistic.is_finite() {
        s += 1.0 / 3.0;
    }
    if test.p_value.is_finite() && (0.0..=1.0).contains(&test.p_value) {
        s += 1.0 / 3.0;
    }
    if test.degrees_of_freedom.map_or(true, |df| df > 0.0) {
        s += 1.0 / 3.0;
    }
    s
}

/// A computed, finite effect with a magnitude scores full credit. An
/// explicit not-computed effect with a stated reason keeps partial
/// credit so designs without a defined effect size can still pass.
fn score_effect(effect: &EffectSize) -> f64 {
    match effect.value() {
        Some(v) if v.is_finite() && effect.magnitude.is_some() => 1.0,
        Some(_) => 0.0,
        None if !effect.interpretation.is_empty() => 0.75,
        None => 0.0,
    }
}

fn score_formatting(test: &HypothesisTestResult, report: &str, figures: &[FigureSpec]) -> f64 {
    let mut s = 0.0;
    if report.contains(&test.test_name) && report.contains("p ") {
        s += 0.5;
    }
    if figures.iter().any(|f| !f.series.is_empty()) {
        s += 0.5;
    }
    s
}

fn score_interpretation(test: &HypothesisTestResult, effect: &EffectSize) -> f64 {
    let mut s = 0.0;
    if test.interpretation.contains("significant") {
        s += 0.5;
    }
    if !effect.interpretation.is_empty() {
        s += 0.5;
    }
    s
}
