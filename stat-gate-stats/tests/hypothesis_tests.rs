use approx::assert_relative_eq;
use test_case::test_case;

use stat_gate_core::{
    AnalysisStrategy, AssumptionCheckResult, CheckStatus, EngineError, GroupSample,
    HomogeneityCheck, NormalityCheck, TestFamily, TestProcedure,
};
use stat_gate_stats::{
    chi_square_independence, dispatch, kruskal_wallis, mann_whitney_u, one_way_anova, paired_t,
    student_t, welch_t, wilcoxon_signed_rank,
};

fn sample(group: &str, values: Vec<f64>) -> GroupSample {
    GroupSample {
        group: group.to_string(),
        values,
    }
}

fn clean_assumptions() -> AssumptionCheckResult {
    AssumptionCheckResult {
        normality: Vec::new(),
        homogeneity: None,
        independence_passed: true,
        remediation_suggestions: Vec::new(),
        alternative_tests: Vec::new(),
    }
}

fn failed_normality(group: &str) -> AssumptionCheckResult {
    AssumptionCheckResult {
        normality: vec![NormalityCheck {
            group: group.to_string(),
            statistic: Some(0.6),
            p_value: Some(0.001),
            status: CheckStatus::Failed,
        }],
        ..clean_assumptions()
    }
}

fn failed_homogeneity() -> AssumptionCheckResult {
    AssumptionCheckResult {
        homogeneity: Some(HomogeneityCheck {
            statistic: 9.0,
            p_value: 0.01,
            passed: false,
        }),
        ..clean_assumptions()
    }
}

// ===== Parametric Tests =====

#[test]
fn test_student_t_known_values() {
    let outcome = student_t(&[1.0, 2.0, 3.0, 4.0, 5.0], &[2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
    assert_relative_eq!(outcome.statistic, -1.0, epsilon = 1e-10);
    assert_relative_eq!(outcome.df.unwrap(), 8.0);
    assert!(outcome.p_value > 0.3 && outcome.p_value < 0.4, "p = {}", outcome.p_value);
}

#[test]
fn test_welch_t_equal_variances_matches_student() {
    let g1 = [1.0, 2.0, 3.0, 4.0, 5.0];
    let g2 = [2.0, 3.0, 4.0, 5.0, 6.0];
    let student = student_t(&g1, &g2).unwrap();
    let welch = welch_t(&g1, &g2).unwrap();
    assert_relative_eq!(welch.statistic, student.statistic, epsilon = 1e-10);
    assert_relative_eq!(welch.df.unwrap(), 8.0, epsilon = 1e-10);
}

#[test]
fn test_paired_t_known_values() {
    let outcome = paired_t(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]).unwrap();
    // Differences -1, -2, -3: mean -2, sd 1.
    assert_relative_eq!(outcome.statistic, -2.0 * 3.0_f64.sqrt(), epsilon = 1e-10);
    assert_relative_eq!(outcome.df.unwrap(), 2.0);
    assert!(outcome.p_value > 0.05 && outcome.p_value < 0.1, "p = {}", outcome.p_value);
}

#[test]
fn test_one_way_anova_known_values() {
    let outcome = one_way_anova(&[
        &[1.0, 2.0, 3.0],
        &[2.0, 3.0, 4.0],
        &[3.0, 4.0, 5.0],
    ])
    .unwrap();
    assert_relative_eq!(outcome.statistic, 3.0, epsilon = 1e-10);
    assert_relative_eq!(outcome.df.unwrap(), 2.0);
    assert_relative_eq!(outcome.df2.unwrap(), 6.0);
    assert_relative_eq!(outcome.p_value, 0.125, epsilon = 1e-9);
}

#[test]
fn test_anova_constant_identical_groups() {
    let outcome = one_way_anova(&[&[2.0, 2.0, 2.0], &[2.0, 2.0, 2.0]]).unwrap();
    assert_relative_eq!(outcome.statistic, 0.0);
    assert_relative_eq!(outcome.p_value, 1.0);
}

#[test]
fn test_parametric_minimum_group_size() {
    assert!(matches!(
        student_t(&[1.0], &[2.0, 3.0]),
        Err(EngineError::Validation(_))
    ));
    assert!(matches!(
        one_way_anova(&[&[1.0, 2.0], &[3.0]]),
        Err(EngineError::Validation(_))
    ));
}

// ===== Rank-Based Tests =====

#[test]
fn test_mann_whitney_u_complete_separation() {
    let outcome = mann_whitney_u(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]).unwrap();
    assert_relative_eq!(outcome.statistic, 0.0);
    assert!(outcome.df.is_none());
    assert!(outcome.p_value > 0.04 && outcome.p_value < 0.06, "p = {}", outcome.p_value);
}

#[test]
fn test_mann_whitney_u_handles_ties() {
    let outcome = mann_whitney_u(&[1.0, 2.0, 2.0, 3.0], &[2.0, 3.0, 3.0, 4.0]).unwrap();
    assert!(outcome.p_value > 0.0 && outcome.p_value <= 1.0);
}

#[test]
fn test_wilcoxon_signed_rank_known_values() {
    let before = [2.0, 4.0, 6.0, 8.0, 10.0, 12.0, 14.0, 16.0];
    let after = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
    let outcome = wilcoxon_signed_rank(&before, &after).unwrap();
    // All 8 differences positive: W+ is the full rank sum.
    assert_relative_eq!(outcome.statistic, 36.0);
    assert!(outcome.p_value > 0.01 && outcome.p_value < 0.02, "p = {}", outcome.p_value);
}

#[test]
fn test_wilcoxon_drops_zero_differences() {
    let err = wilcoxon_signed_rank(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]).unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[test]
fn test_kruskal_wallis_known_values() {
    let outcome = kruskal_wallis(&[
        &[1.0, 2.0, 3.0],
        &[4.0, 5.0, 6.0],
        &[7.0, 8.0, 9.0],
    ])
    .unwrap();
    assert_relative_eq!(outcome.statistic, 7.2, epsilon = 1e-10);
    assert_relative_eq!(outcome.df.unwrap(), 2.0);
    assert!(outcome.p_value > 0.02 && outcome.p_value < 0.04, "p = {}", outcome.p_value);
}

// ===== Categorical Tests =====

#[test]
fn test_chi_square_known_values() {
    let mut g1 = vec![0.0; 20];
    g1.extend(vec![1.0; 10]);
    let mut g2 = vec![0.0; 10];
    g2.extend(vec![1.0; 20]);
    let outcome = chi_square_independence(&[sample("a", g1), sample("b", g2)]).unwrap();

    assert_relative_eq!(outcome.statistic, 20.0 / 3.0, epsilon = 1e-10);
    assert_relative_eq!(outcome.df.unwrap(), 1.0);
    assert!(outcome.p_value > 0.005 && outcome.p_value < 0.02, "p = {}", outcome.p_value);
}

#[test]
fn test_chi_square_requires_two_categories() {
    let err = chi_square_independence(&[
        sample("a", vec![1.0, 1.0]),
        sample("b", vec![1.0, 1.0]),
    ])
    .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

// ===== Dispatch Tests =====

#[test]
fn test_dispatch_runs_planned_test_when_assumptions_hold() {
    let samples = [
        sample("a", vec![1.0, 2.0, 3.0, 4.0, 5.0]),
        sample("b", vec![2.0, 3.0, 4.0, 5.0, 6.0]),
    ];
    let strategy = AnalysisStrategy::new(TestFamily::TwoIndependent);
    let result = dispatch::execute(&samples, &strategy, &clean_assumptions()).unwrap();

    assert_eq!(result.planned, TestProcedure::StudentT);
    assert_eq!(result.executed, TestProcedure::StudentT);
    assert!(!result.was_substituted());
    assert!(result.interpretation.contains("t(8)"));
}

#[test]
fn test_dispatch_substitutes_on_normality_failure() {
    let samples = [
        sample("a", vec![1.0, 1.1, 1.2, 1.3, 10.0]),
        sample("b", vec![2.0, 2.1, 2.2, 2.3, 20.0]),
    ];
    let strategy = AnalysisStrategy::new(TestFamily::TwoIndependent);
    let result = dispatch::execute(&samples, &strategy, &failed_normality("a")).unwrap();

    assert_eq!(result.planned, TestProcedure::StudentT);
    assert_eq!(result.executed, TestProcedure::MannWhitneyU);
    assert!(result.was_substituted());
    assert!(result.interpretation.contains("substituted"));
}

#[test]
fn test_dispatch_substitutes_welch_on_homogeneity_only_failure() {
    let samples = [
        sample("a", vec![1.0, 2.0, 3.0, 4.0, 5.0]),
        sample("b", vec![10.0, 20.0, 30.0, 40.0, 50.0]),
    ];
    let strategy = AnalysisStrategy::new(TestFamily::TwoIndependent);
    let result = dispatch::execute(&samples, &strategy, &failed_homogeneity()).unwrap();

    assert_eq!(result.executed, TestProcedure::WelchT);
}

#[test]
fn test_dispatch_normality_failure_outranks_homogeneity() {
    let samples = [
        sample("a", vec![1.0, 1.1, 1.2, 1.3, 10.0]),
        sample("b", vec![10.0, 20.0, 30.0, 40.0, 50.0]),
    ];
    let both_failed = AssumptionCheckResult {
        homogeneity: Some(HomogeneityCheck {
            statistic: 9.0,
            p_value: 0.01,
            passed: false,
        }),
        ..failed_normality("a")
    };
    let strategy = AnalysisStrategy::new(TestFamily::TwoIndependent);
    let result = dispatch::execute(&samples, &strategy, &both_failed).unwrap();

    assert_eq!(result.executed, TestProcedure::MannWhitneyU);
}

#[test]
fn test_dispatch_prefer_nonparametric_plans_rank_test() {
    let samples = [
        sample("a", vec![1.0, 2.0, 3.0, 4.0, 5.0]),
        sample("b", vec![2.0, 3.0, 4.0, 5.0, 6.0]),
    ];
    let mut strategy = AnalysisStrategy::new(TestFamily::TwoIndependent);
    strategy.prefer_nonparametric = true;
    let result = dispatch::execute(&samples, &strategy, &clean_assumptions()).unwrap();

    // Planned and executed agree: no substitution happened.
    assert_eq!(result.planned, TestProcedure::MannWhitneyU);
    assert_eq!(result.executed, TestProcedure::MannWhitneyU);
    assert!(!result.was_substituted());
}

#[test]
fn test_dispatch_group_count_mismatch() {
    let samples = [
        sample("a", vec![1.0, 2.0, 3.0]),
        sample("b", vec![2.0, 3.0, 4.0]),
        sample("c", vec![3.0, 4.0, 5.0]),
    ];
    let strategy = AnalysisStrategy::new(TestFamily::TwoIndependent);
    let err = dispatch::execute(&samples, &strategy, &clean_assumptions()).unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

// ===== Formatting Tests =====

#[test_case(0.0001, "p < .001" ; "below reporting floor")]
#[test_case(0.001, "p = .001" ; "at reporting floor")]
#[test_case(0.347, "p = .347" ; "no leading zero")]
#[test_case(0.05, "p = .050" ; "trailing zeros kept")]
#[test_case(1.0, "p = 1.000" ; "certainty")]
fn test_format_p(p: f64, expected: &str) {
    assert_eq!(dispatch::format_p(p), expected);
}

// ===== Probability Bounds =====

#[test]
fn test_p_values_stay_in_unit_interval() {
    let extreme1: Vec<f64> = (0..50).map(|i| i as f64).collect();
    let extreme2: Vec<f64> = (0..50).map(|i| 1000.0 + i as f64).collect();

    for outcome in [
        student_t(&extreme1, &extreme2).unwrap(),
        welch_t(&extreme1, &extreme2).unwrap(),
        mann_whitney_u(&extreme1, &extreme2).unwrap(),
    ] {
        assert!(
            (0.0..=1.0).contains(&outcome.p_value),
            "{:?}: p = {}",
            outcome.procedure,
            outcome.p_value
        );
    }
}
