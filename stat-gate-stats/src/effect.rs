//! Standardized effect sizes with qualitative interpretation.

use statrs::statistics::Statistics;

use stat_gate_core::{EffectMagnitude, EffectSize, EngineError, GroupSample, Result, TestFamily};

/// |d| thresholds for standardized mean differences (Cohen, 1988).
const D_SMALL: f64 = 0.2;
const D_MEDIUM: f64 = 0.5;
const D_LARGE: f64 = 0.8;

/// Eta-squared thresholds for proportion-of-variance effect sizes.
const ETA_SMALL: f64 = 0.01;
const ETA_MEDIUM: f64 = 0.06;
const ETA_LARGE: f64 = 0.14;

/// Below this per-group n the small-sample bias-corrected Hedges' g is
/// reported instead of Cohen's d.
const SMALL_SAMPLE_N: usize = 20;

/// Compute the effect size appropriate for the executed test family.
pub fn for_family(family: TestFamily, samples: &[GroupSample]) -> Result<EffectSize> {
    match family {
        TestFamily::TwoIndependent | TestFamily::TwoPaired => {
            let (g1, g2) = two_samples(samples)?;
            two_group(g1, g2)
        }
        TestFamily::KIndependent => {
            let groups: Vec<&[f64]> = samples.iter().map(|s| s.values.as_slice()).collect();
            k_group(&groups)
        }
        TestFamily::CategoricalAssociation => Ok(EffectSize::not_computed(
            "Effect size not computed for categorical associations in this version; \
             interpret the association via the test statistic and counts.",
        )),
    }
}

/// Standardized mean difference for two groups: Cohen's d with pooled
/// standard deviation, or Hedges' g when either group is small.
pub fn two_group(group1: &[f64], group2: &[f64]) -> Result<EffectSize> {
    if group1.len() < 2 || group2.len() < 2 {
        return Err(EngineError::Validation(
            "effect size requires at least 2 observations per group".to_string(),
        ));
    }

    let n1 = group1.len() as f64;
    let n2 = group2.len() as f64;
    let var1 = group1.variance();
    let var2 = group2.variance();
    let df = n1 + n2 - 2.0;

    let pooled_sd = (((n1 - 1.0) * var1 + (n2 - 1.0) * var2) / df).sqrt();
    if pooled_sd <= 0.0 {
        return Err(EngineError::Internal(
            "zero pooled standard deviation in effect size".to_string(),
        ));
    }

    let d = (group1.mean() - group2.mean()) / pooled_sd;
    let magnitude = classify_d(d);

    if group1.len() < SMALL_SAMPLE_N || group2.len() < SMALL_SAMPLE_N {
        // Small-sample bias correction (Hedges & Olkin, 1985).
        let correction = 1.0 - 3.0 / (4.0 * df - 1.0);
        let g = d * correction;
        let magnitude = classify_d(g);
        return Ok(EffectSize {
            cohens_d: None,
            hedges_g: Some(g),
            eta_squared: None,
            magnitude: Some(magnitude),
            interpretation: format!(
                "Hedges' g = {:.2}, a {} standardized mean difference (bias-corrected for small samples).",
                g,
                magnitude.label()
            ),
        });
    }

    Ok(EffectSize {
        cohens_d: Some(d),
        hedges_g: None,
        eta_squared: None,
        magnitude: Some(magnitude),
        interpretation: format!(
            "Cohen's d = {:.2}, a {} standardized mean difference.",
            d,
            magnitude.label()
        ),
    })
}

/// Proportion of variance explained by group membership (eta-squared)
/// for k-group designs.
pub fn k_group(groups: &[&[f64]]) -> Result<EffectSize> {
    if groups.len() < 2 || groups.iter().any(|g| g.is_empty()) {
        return Err(EngineError::Validation(
            "eta-squared requires at least 2 non-empty groups".to_string(),
        ));
    }

    let total_n: usize = groups.iter().map(|g| g.len()).sum();
    let grand_mean: f64 = groups.iter().flat_map(|g| g.iter()).sum::<f64>() / total_n as f64;

    let mut ss_between = 0.0;
    let mut ss_total = 0.0;
    for g in groups {
        let mean = g.mean();
        ss_between += g.len() as f64 * (mean - grand_mean).powi(2);
        ss_total += g.iter().map(|&x| (x - grand_mean).powi(2)).sum::<f64>();
    }
    if ss_total <= 0.0 {
        return Err(EngineError::Internal(
            "zero total variance in eta-squared".to_string(),
        ));
    }

    let eta = ss_between / ss_total;
    let magnitude = classify_eta(eta);
    Ok(EffectSize {
        cohens_d: None,
        hedges_g: None,
        eta_squared: Some(eta),
        magnitude: Some(magnitude),
        interpretation: format!(
            "Eta-squared = {:.3}: group membership explains a {} proportion of outcome variance.",
            eta,
            magnitude.label()
        ),
    })
}

fn classify_d(d: f64) -> EffectMagnitude {
    let v = d.abs();
    if v < D_SMALL {
        EffectMagnitude::Negligible
    } else if v < D_MEDIUM {
        EffectMagnitude::Small
    } else if v < D_LARGE {
        EffectMagnitude::Medium
    } else {
        EffectMagnitude::Large
    }
}

fn classify_eta(eta: f64) -> EffectMagnitude {
    if eta < ETA_SMALL {
        EffectMagnitude::Negligible
    } else if eta < ETA_MEDIUM {
        EffectMagnitude::Small
    } else if eta < ETA_LARGE {
        EffectMagnitude::Medium
    } else {
        EffectMagnitude::Large
    }
}

fn two_samples(samples: &[GroupSample]) -> Result<(&[f64], &[f64])> {
    if samples.len() != 2 {
        return Err(EngineError::Validation(format!(
            "two-group effect size expects exactly 2 groups, got {}",
            samples.len()
        )));
    }
    Ok((samples[0].values.as_slice(), samples[1].values.as_slice()))
}
