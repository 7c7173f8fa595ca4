//! Report text and figure specifications.
//!
//! The report is plain text in a journal-manuscript register; figures
//! are data-only specifications for an external renderer.

use stat_gate_core::{
    AssumptionCheckResult, ChartKind, DescriptiveStats, EffectSize, FigureSpec, GroupSample,
    HypothesisTestResult, OutcomeType,
};
use stat_gate_stats::{distinct_categories, normal_scores};

/// Assemble the standardized textual report for one analysis attempt.
pub fn format_report(
    title: &str,
    variable: &str,
    descriptives: &[DescriptiveStats],
    test: &HypothesisTestResult,
    effect: &EffectSize,
    assumptions: &AssumptionCheckResult,
) -> String {
    let mut out = String::new();

    out.push_str(&format!("Analysis of '{}' ({})\n\n", variable, title));

    out.push_str("Descriptive statistics:\n");
    for d in descriptives {
        out.push_str(&format!(
            "  {}: n = {}, M = {:.2}, SD = {:.2}, Mdn = {:.2}, IQR = {:.2}\n",
            d.group, d.count, d.mean, d.std_dev, d.median, d.iqr
        ));
    }
    out.push('\n');

    out.push_str("Assumption checks:\n");
    if assumptions.normality.is_empty() && assumptions.homogeneity.is_none() {
        out.push_str("  Not applicable for categorical outcomes.\n");
    }
    for check in &assumptions.normality {
        match (check.statistic, check.p_value) {
            (Some(w), Some(p)) => out.push_str(&format!(
                "  Normality ({}): W = {:.3}, {} ({:?}).\n",
                check.group,
                w,
                stat_gate_stats::format_p(p),
                check.status
            )),
            _ => out.push_str(&format!(
                "  Normality ({}): not testable at this sample size.\n",
                check.group
            )),
        }
    }
    if let Some(h) = &assumptions.homogeneity {
        out.push_str(&format!(
            "  Homogeneity of variance: F = {:.3}, {} ({}).\n",
            h.statistic,
            stat_gate_stats::format_p(h.p_value),
            if h.passed { "passed" } else { "failed" }
        ));
    }
    out.push_str(&format!(
        "  Independence (by design): {}.\n",
        if assumptions.independence_passed {
            "passed"
        } else {
            "violated"
        }
    ));
    for suggestion in &assumptions.remediation_suggestions {
        out.push_str(&format!("  Note: {}\n", suggestion));
    }
    out.push('\n');

    out.push_str(&format!("Hypothesis test: {}\n", test.test_name));
    if test.was_substituted() {
        out.push_str(&format!(
            "  Substituted for the planned {} after assumption checks.\n",
            test.planned.name()
        ));
    }
    out.push_str(&format!("  {}\n", test.interpretation));
    out.push_str(&format!("  Reference: {}\n\n", test.citation));

    out.push_str(&format!("Effect size: {}\n", effect.interpretation));

    out
}

/// Build the default figure set for one analysis: a grouped boxplot, a
/// histogram and Q-Q plot per group for continuous outcomes, and a bar
/// chart of group means (or category counts for categorical outcomes).
pub fn build_figures(
    variable: &str,
    samples: &[GroupSample],
    descriptives: &[DescriptiveStats],
    outcome_type: OutcomeType,
) -> Vec<FigureSpec> {
    let mut figures = Vec::new();

    if outcome_type == OutcomeType::Categorical {
        figures.push(category_counts(variable, samples));
        return figures;
    }

    let mut boxplot = FigureSpec::new(
        ChartKind::Boxplot,
        format!("{} by group", variable),
        "group",
        variable,
    );
    for s in samples {
        boxplot = boxplot.with_series(s.group.clone(), s.values.clone());
    }
    figures.push(boxplot);

    for s in samples {
        figures.push(
            FigureSpec::new(
                ChartKind::Histogram,
                format!("Distribution of {} ({})", variable, s.group),
                variable,
                "frequency",
            )
            .with_series(s.group.clone(), s.values.clone()),
        );

        let mut sorted = s.values.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        figures.push(
            FigureSpec::new(
                ChartKind::QqPlot,
                format!("Normal Q-Q plot of {} ({})", variable, s.group),
                "theoretical quantiles",
                "sample quantiles",
            )
            .with_series("theoretical", normal_scores(sorted.len()))
            .with_series("sample", sorted),
        );
    }

    figures.push(
        FigureSpec::new(
            ChartKind::Bar,
            format!("Mean {} by group", variable),
            "group",
            format!("mean {}", variable),
        )
        .with_series(
            "mean",
            descriptives.iter().map(|d| d.mean).collect::<Vec<f64>>(),
        ),
    );

    figures
}

fn category_counts(variable: &str, samples: &[GroupSample]) -> FigureSpec {
    let categories = distinct_categories(samples);
    let mut figure = FigureSpec::new(
        ChartKind::Bar,
        format!("{} category counts by group", variable),
        variable,
        "count",
    );
    for s in samples {
        let counts: Vec<f64> = categories
            .iter()
            .map(|&c| s.values.iter().filter(|&&v| v == c).count() as f64)
            .collect();
        figure = figure.with_series(s.group.clone(), counts);
    }
    figure
}
