//! Assumption checks for the supported test families.
//!
//! Normality is tested per group with the Shapiro-Wilk test (Royston's
//! AS R94 approximation, valid for 3 <= n <= 5000); homogeneity of
//! variance across groups with the Brown-Forsythe test (Levene with
//! median centres). Independence is design-based and never data-tested.

use statrs::distribution::{ContinuousCDF, Normal};
use statrs::statistics::Statistics;

use stat_gate_core::{
    AssumptionCheckResult, CheckStatus, GroupSample, HomogeneityCheck, NormalityCheck, StudyDesign,
    TestFamily,
};

use crate::tests::parametric::one_way_anova;

/// Fixed significance level for assumption checks.
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Groups smaller than this are marked not-testable for normality rather
/// than failed, to avoid false remediation triggers on tiny samples.
pub const MIN_NORMALITY_N: usize = 3;

/// Run all assumption checks for the candidate test family.
///
/// Failures never abort the pipeline; they are recorded together with
/// remediation suggestions and alternative tests so the dispatcher and
/// the quality gate can act on them.
pub fn check(
    samples: &[GroupSample],
    family: TestFamily,
    design: StudyDesign,
) -> AssumptionCheckResult {
    let continuous = family != TestFamily::CategoricalAssociation;

    let normality: Vec<NormalityCheck> = if continuous {
        samples.iter().map(check_normality).collect()
    } else {
        Vec::new()
    };

    // Variance equality across groups is not an assumption of paired
    // comparisons, which test within-pair differences.
    let homogeneity = if continuous && !family.accounts_for_dependence() && samples.len() >= 2 {
        check_homogeneity(samples)
    } else {
        None
    };

    let independence_passed = !design.is_dependent() || family.accounts_for_dependence();

    let mut result = AssumptionCheckResult {
        normality,
        homogeneity,
        independence_passed,
        remediation_suggestions: Vec::new(),
        alternative_tests: Vec::new(),
    };
    add_remediations(&mut result, family);

    if result.any_failed() {
        tracing::warn!(
            family = ?family,
            normality_failed = result.normality_failed(),
            homogeneity_failed = result.homogeneity_failed(),
            "assumption check failed; remediation suggested"
        );
    }

    result
}

fn check_normality(sample: &GroupSample) -> NormalityCheck {
    if sample.values.len() < MIN_NORMALITY_N {
        return NormalityCheck {
            group: sample.group.clone(),
            statistic: None,
            p_value: None,
            status: CheckStatus::NotTestable,
        };
    }

    match shapiro_wilk(&sample.values) {
        Some((w, p)) => NormalityCheck {
            group: sample.group.clone(),
            statistic: Some(w),
            p_value: Some(p),
            status: if p < SIGNIFICANCE_LEVEL {
                CheckStatus::Failed
            } else {
                CheckStatus::Passed
            },
        },
        // Degenerate sample (e.g. all values identical).
        None => NormalityCheck {
            group: sample.group.clone(),
            statistic: None,
            p_value: None,
            status: CheckStatus::NotTestable,
        },
    }
}

fn check_homogeneity(samples: &[GroupSample]) -> Option<HomogeneityCheck> {
    if samples.iter().any(|s| s.values.len() < 2) {
        return None;
    }

    // Brown-Forsythe: one-way ANOVA over absolute deviations from the
    // group medians.
    let z_groups: Vec<Vec<f64>> = samples
        .iter()
        .map(|s| {
            let mut sorted = s.values.clone();
            sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            let median = crate::descriptive::quantile(&sorted, 0.5);
            s.values.iter().map(|&x| (x - median).abs()).collect()
        })
        .collect();
    let z_refs: Vec<&[f64]> = z_groups.iter().map(|v| v.as_slice()).collect();

    let outcome = one_way_anova(&z_refs).ok()?;
    Some(HomogeneityCheck {
        statistic: outcome.statistic,
        p_value: outcome.p_value,
        passed: outcome.p_value >= SIGNIFICANCE_LEVEL,
    })
}

/// Remediation policy: every failure yields two independent options, an
/// alternative procedure and a data transformation. Transformations are
/// advisory only and never applied silently.
fn add_remediations(result: &mut AssumptionCheckResult, family: TestFamily) {
    let base = family.default_procedure();

    if result.normality_failed() {
        let failed: Vec<&str> = result
            .normality
            .iter()
            .filter(|c| c.status.failed())
            .map(|c| c.group.as_str())
            .collect();
        if let Some(alt) = base.nonparametric_alternative() {
            result.remediation_suggestions.push(format!(
                "Normality violated in group(s) {}: use the non-parametric {} instead of the planned {}.",
                failed.join(", "),
                alt.name(),
                base.name()
            ));
            result.alternative_tests.push(alt);
        }
        result.remediation_suggestions.push(
            "Normality violated: a log or rank transformation of the outcome may restore \
             normality; apply explicitly and re-run the checks."
                .to_string(),
        );
    }

    if result.homogeneity_failed() {
        if let Some(robust) = base.variance_robust_alternative() {
            result.remediation_suggestions.push(format!(
                "Variances are unequal across groups: use the variance-robust {} instead of the planned {}.",
                robust.name(),
                base.name()
            ));
            if !result.alternative_tests.contains(&robust) {
                result.alternative_tests.push(robust);
            }
        }
        result.remediation_suggestions.push(
            "Variances are unequal across groups: a variance-stabilizing transformation \
             (e.g. log) may equalize spread; apply explicitly and re-run the checks."
                .to_string(),
        );
    }

    if !result.independence_passed {
        result.remediation_suggestions.push(
            "Observations are dependent by design: select a paired or repeated-measures \
             procedure so the dependence is modelled."
                .to_string(),
        );
    }
}

// ===== Shapiro-Wilk (Royston AS R94) =====

// Polynomial coefficients from Royston (1995), Remark AS R94.
const SW_C1: [f64; 6] = [0.0, 0.221157, -0.147981, -2.07119, 4.434685, -2.706056];
const SW_C2: [f64; 6] = [0.0, 0.042981, -0.293762, -1.752461, 5.682633, -3.582633];
const SW_C3: [f64; 4] = [0.544, -0.39978, 0.025054, -6.714e-4];
const SW_C4: [f64; 4] = [1.3822, -0.77857, 0.062767, -0.0020322];
const SW_C5: [f64; 4] = [-1.5861, -0.31082, -0.083751, 0.0038915];
const SW_C6: [f64; 3] = [-0.4803, -0.082676, 0.0030302];
const SW_G: [f64; 2] = [-2.273, 0.459];

/// Shapiro-Wilk W test for normality.
///
/// Returns `(w, p_value)`, or `None` when the sample is outside the
/// supported range (3..=5000) or degenerate (all values identical).
pub fn shapiro_wilk(data: &[f64]) -> Option<(f64, f64)> {
    let n = data.len();
    if !(3..=5000).contains(&n) {
        return None;
    }
    if data.iter().any(|v| !v.is_finite()) {
        return None;
    }

    let mut x = data.to_vec();
    x.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    if x[n - 1] - x[0] < 1e-300 {
        return None;
    }

    if n == 3 {
        return shapiro_wilk_n3(&x);
    }

    let half = n / 2;
    let a = sw_coefficients(n, half)?;

    // W = (sum a_i (x_(n+1-i) - x_(i)))^2 / sum (x_i - mean)^2
    let mut sa = 0.0;
    for i in 0..half {
        sa += a[i] * (x[n - 1 - i] - x[i]);
    }
    let mean = (&x[..]).mean();
    let ss: f64 = x.iter().map(|&v| (v - mean).powi(2)).sum();
    if ss < 1e-300 {
        return None;
    }

    let w = ((sa * sa) / ss).min(1.0);
    Some((w, sw_p_value(w, n).clamp(0.0, 1.0)))
}

// n = 3 has an exact distribution.
fn shapiro_wilk_n3(x: &[f64]) -> Option<(f64, f64)> {
    let mean = (x[0] + x[1] + x[2]) / 3.0;
    let ss = x.iter().map(|&v| (v - mean).powi(2)).sum::<f64>();
    if ss < 1e-300 {
        return None;
    }

    let numerator = std::f64::consts::FRAC_1_SQRT_2 * (x[2] - x[0]);
    let w = ((numerator * numerator) / ss).clamp(0.75, 1.0);
    let p = (1.0 - (6.0 / std::f64::consts::PI) * w.sqrt().acos()).clamp(0.0, 1.0);
    Some((w, p))
}

fn sw_coefficients(n: usize, half: usize) -> Option<Vec<f64>> {
    let normal = standard_normal();

    // Blom approximation of expected normal order statistics.
    let mut m = vec![0.0; half];
    let mut summ2 = 0.0;
    for (i, mi) in m.iter_mut().enumerate() {
        let p = (i as f64 + 1.0 - 0.375) / (n as f64 + 0.25);
        *mi = normal.inverse_cdf(p);
        summ2 += *mi * *mi;
    }
    summ2 *= 2.0;
    let ssumm2 = summ2.sqrt();
    let rsn = 1.0 / (n as f64).sqrt();

    let mut a = vec![0.0; half];
    let a1 = sw_poly(&SW_C1, rsn) - m[0] / ssumm2;

    if n <= 5 {
        let numerator = summ2 - 2.0 * m[0] * m[0];
        let denominator = 1.0 - 2.0 * a1 * a1;
        if numerator <= 0.0 || denominator <= 0.0 {
            return None;
        }
        let fac = (numerator / denominator).sqrt();
        a[0] = a1;
        for i in 1..half {
            a[i] = -m[i] / fac;
        }
    } else {
        let a2 = -m[1] / ssumm2 + sw_poly(&SW_C2, rsn);
        let numerator = summ2 - 2.0 * m[0] * m[0] - 2.0 * m[1] * m[1];
        let denominator = 1.0 - 2.0 * a1 * a1 - 2.0 * a2 * a2;
        if numerator <= 0.0 || denominator <= 0.0 {
            return None;
        }
        let fac = (numerator / denominator).sqrt();
        a[0] = a1;
        a[1] = a2;
        for i in 2..half {
            a[i] = -m[i] / fac;
        }
    }

    Some(a)
}

fn sw_p_value(w: f64, n: usize) -> f64 {
    let nf = n as f64;
    let w1 = 1.0 - w;
    if w1 <= 0.0 {
        return 1.0;
    }
    let y = w1.ln();
    let normal = standard_normal();

    if n <= 11 {
        let gamma = sw_poly(&SW_G, nf);
        if y >= gamma {
            return 0.0;
        }
        let y2 = -(gamma - y).ln();
        let mu = sw_poly(&SW_C3, nf);
        let sigma = sw_poly(&SW_C4, nf).exp();
        if sigma < 1e-300 {
            return 0.0;
        }
        1.0 - normal.cdf((y2 - mu) / sigma)
    } else {
        let log_n = nf.ln();
        let mu = sw_poly(&SW_C5, log_n);
        let sigma = sw_poly(&SW_C6, log_n).exp();
        if sigma < 1e-300 {
            return 0.0;
        }
        1.0 - normal.cdf((y - mu) / sigma)
    }
}

// Horner evaluation: c[0] + c[1]x + c[2]x^2 + ...
fn sw_poly(c: &[f64], x: f64) -> f64 {
    let mut result = c[c.len() - 1];
    for i in (0..c.len() - 1).rev() {
        result = result * x + c[i];
    }
    result
}

/// Blom normal scores for a sample of size `n`, used as theoretical
/// quantiles in Q-Q plot specifications.
pub fn normal_scores(n: usize) -> Vec<f64> {
    let normal = standard_normal();
    (1..=n)
        .map(|i| normal.inverse_cdf((i as f64 - 0.375) / (n as f64 + 0.25)))
        .collect()
}

fn standard_normal() -> Normal {
    Normal::new(0.0, 1.0).unwrap()
}
