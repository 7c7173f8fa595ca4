//! Test selection and execution.
//!
//! The dispatcher refines a planned strategy into a concrete procedure,
//! substitutes the appropriate alternative when assumption checks failed,
//! and records both the planned and the executed procedure so the report
//! and the quality gate stay honest about substitutions.

use stat_gate_core::{
    AnalysisStrategy, AssumptionCheckResult, EngineError, GroupSample, HypothesisTestResult,
    Result, TestFamily, TestProcedure,
};

use crate::tests::{
    chi_square_independence, kruskal_wallis, mann_whitney_u, one_way_anova, paired_t, student_t,
    welch_t, wilcoxon_signed_rank, TestOutcome,
};

/// The procedure the strategy commits to before assumption outcomes are
/// known.
pub fn planned_procedure(strategy: &AnalysisStrategy) -> TestProcedure {
    let base = strategy.family.default_procedure();
    if strategy.prefer_nonparametric {
        base.nonparametric_alternative().unwrap_or(base)
    } else {
        base
    }
}

/// Select and run the correct procedure for the strategy and assumption
/// outcomes.
pub fn execute(
    samples: &[GroupSample],
    strategy: &AnalysisStrategy,
    assumptions: &AssumptionCheckResult,
) -> Result<HypothesisTestResult> {
    let planned = planned_procedure(strategy);
    let executed = substitute(planned, assumptions);

    if executed != planned {
        tracing::warn!(
            planned = planned.name(),
            executed = executed.name(),
            "assumption failure: substituting alternative procedure"
        );
    }

    let outcome = run(executed, strategy.family, samples)?;
    let interpretation = interpret(&outcome, planned);

    Ok(HypothesisTestResult {
        test_name: executed.name().to_string(),
        planned,
        executed,
        statistic: outcome.statistic,
        degrees_of_freedom: outcome.df,
        p_value: outcome.p_value,
        interpretation,
        citation: executed.citation().to_string(),
    })
}

// Deterministic tie-break: when both a rank-based substitute and a
// variance-robust correction would apply, the rank-based substitute wins.
fn substitute(planned: TestProcedure, assumptions: &AssumptionCheckResult) -> TestProcedure {
    if !planned.is_parametric() {
        return planned;
    }
    if assumptions.normality_failed() {
        return planned.nonparametric_alternative().unwrap_or(planned);
    }
    if assumptions.homogeneity_failed() {
        return planned.variance_robust_alternative().unwrap_or(planned);
    }
    planned
}

fn run(
    procedure: TestProcedure,
    family: TestFamily,
    samples: &[GroupSample],
) -> Result<TestOutcome> {
    match procedure {
        TestProcedure::StudentT
        | TestProcedure::WelchT
        | TestProcedure::PairedT
        | TestProcedure::MannWhitneyU
        | TestProcedure::WilcoxonSignedRank => {
            let (g1, g2) = two_samples(samples, family)?;
            match procedure {
                TestProcedure::StudentT => student_t(g1, g2),
                TestProcedure::WelchT => welch_t(g1, g2),
                TestProcedure::PairedT => paired_t(g1, g2),
                TestProcedure::MannWhitneyU => mann_whitney_u(g1, g2),
                TestProcedure::WilcoxonSignedRank => wilcoxon_signed_rank(g1, g2),
                _ => unreachable!(),
            }
        }
        TestProcedure::OneWayAnova | TestProcedure::KruskalWallis => {
            let groups: Vec<&[f64]> = samples.iter().map(|s| s.values.as_slice()).collect();
            match procedure {
                TestProcedure::OneWayAnova => one_way_anova(&groups),
                _ => kruskal_wallis(&groups),
            }
        }
        TestProcedure::ChiSquareIndependence => chi_square_independence(samples),
    }
}

fn two_samples<'a>(
    samples: &'a [GroupSample],
    family: TestFamily,
) -> Result<(&'a [f64], &'a [f64])> {
    if samples.len() != 2 {
        return Err(EngineError::Validation(format!(
            "{:?} strategy expects exactly 2 groups, got {}",
            family,
            samples.len()
        )));
    }
    Ok((samples[0].values.as_slice(), samples[1].values.as_slice()))
}

fn interpret(outcome: &TestOutcome, planned: TestProcedure) -> String {
    let executed = outcome.procedure;
    let significant = outcome.p_value < 0.05;

    let finding = match executed {
        TestProcedure::ChiSquareIndependence => {
            if significant {
                "a statistically significant association between group and outcome"
            } else {
                "no statistically significant association between group and outcome"
            }
        }
        _ => {
            if significant {
                "a statistically significant difference between groups"
            } else {
                "no statistically significant difference between groups"
            }
        }
    };

    let mut text = format!(
        "{} indicated {}, {}.",
        executed.name(),
        finding,
        statistic_phrase(outcome)
    );
    if executed != planned {
        text.push_str(&format!(
            " {} was substituted for the planned {} after assumption checks.",
            executed.name(),
            planned.name()
        ));
    }
    text
}

/// APA-style statistic phrase, e.g. `t(8) = -1.00, p = .347` or
/// `F(2, 27) = 4.31, p = .024`.
fn statistic_phrase(outcome: &TestOutcome) -> String {
    let symbol = statistic_symbol(outcome.procedure);
    let stat = match (outcome.df, outcome.df2) {
        (Some(df1), Some(df2)) => format!(
            "{}({}, {}) = {:.2}",
            symbol,
            format_df(df1),
            format_df(df2),
            outcome.statistic
        ),
        (Some(df1), None) => format!("{}({}) = {:.2}", symbol, format_df(df1), outcome.statistic),
        _ => format!("{} = {:.2}", symbol, outcome.statistic),
    };
    format!("{}, {}", stat, format_p(outcome.p_value))
}

fn statistic_symbol(procedure: TestProcedure) -> &'static str {
    match procedure {
        TestProcedure::StudentT | TestProcedure::WelchT | TestProcedure::PairedT => "t",
        TestProcedure::MannWhitneyU => "U",
        TestProcedure::WilcoxonSignedRank => "W",
        TestProcedure::OneWayAnova => "F",
        TestProcedure::KruskalWallis => "H",
        TestProcedure::ChiSquareIndependence => "chi2",
    }
}

fn format_df(df: f64) -> String {
    if (df - df.round()).abs() < 1e-9 {
        format!("{}", df.round() as i64)
    } else {
        format!("{:.1}", df)
    }
}

/// APA p-value formatting: `p < .001` below the reporting floor,
/// otherwise `p = .xxx` without a leading zero.
pub fn format_p(p: f64) -> String {
    if p < 0.001 {
        "p < .001".to_string()
    } else {
        format!("p = {}", format!("{:.3}", p).trim_start_matches('0'))
    }
}
