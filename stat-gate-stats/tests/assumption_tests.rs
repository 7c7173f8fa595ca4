use stat_gate_core::{CheckStatus, GroupSample, StudyDesign, TestFamily, TestProcedure};
use stat_gate_stats::{assumptions, normal_scores, shapiro_wilk};

fn sample(group: &str, values: Vec<f64>) -> GroupSample {
    GroupSample {
        group: group.to_string(),
        values,
    }
}

// ===== Shapiro-Wilk Tests =====

#[test]
fn test_shapiro_wilk_accepts_normal_shaped_data() {
    // Expected normal order statistics are as normal as a sample gets.
    let data = normal_scores(20);
    let (w, p) = shapiro_wilk(&data).unwrap();
    assert!(w > 0.95, "W = {}", w);
    assert!(p > 0.5, "p = {}", p);
}

#[test]
fn test_shapiro_wilk_rejects_small_skewed_sample() {
    let data = [1.0, 1.1, 1.2, 1.3, 10.0];
    let (w, p) = shapiro_wilk(&data).unwrap();
    assert!(w < 0.8, "W = {}", w);
    assert!(p < 0.05, "p = {}", p);
}

#[test]
fn test_shapiro_wilk_exact_n3() {
    let (w, p) = shapiro_wilk(&[1.0, 2.0, 3.0]).unwrap();
    assert!(w > 0.99, "W = {}", w);
    assert!(p > 0.9, "p = {}", p);
}

#[test]
fn test_shapiro_wilk_out_of_range() {
    assert!(shapiro_wilk(&[1.0, 2.0]).is_none());
    assert!(shapiro_wilk(&[]).is_none());
}

#[test]
fn test_shapiro_wilk_degenerate_sample() {
    assert!(shapiro_wilk(&[5.0, 5.0, 5.0, 5.0]).is_none());
    assert!(shapiro_wilk(&[1.0, f64::NAN, 3.0]).is_none());
}

// ===== Normality Check Tests =====

#[test]
fn test_normality_not_testable_below_minimum_n() {
    let samples = [sample("a", vec![1.0, 2.0]), sample("b", vec![3.0, 4.0])];
    let result = assumptions::check(
        &samples,
        TestFamily::TwoIndependent,
        StudyDesign::Independent,
    );
    for check in &result.normality {
        assert_eq!(check.status, CheckStatus::NotTestable);
        assert!(check.p_value.is_none());
    }
    // Not-testable never triggers remediation.
    assert!(!result.normality_failed());
}

#[test]
fn test_normality_failure_recorded_per_group() {
    let samples = [
        sample("skewed", vec![1.0, 1.1, 1.2, 1.3, 10.0]),
        sample("normal", normal_scores(20)),
    ];
    let result = assumptions::check(
        &samples,
        TestFamily::TwoIndependent,
        StudyDesign::Independent,
    );
    assert_eq!(result.normality[0].status, CheckStatus::Failed);
    assert_eq!(result.normality[1].status, CheckStatus::Passed);
    assert!(result.normality_failed());
}

// ===== Homogeneity Tests =====

#[test]
fn test_homogeneity_passes_for_equal_spread() {
    let samples = [
        sample("a", vec![1.0, 2.0, 3.0, 4.0, 5.0]),
        sample("b", vec![2.0, 3.0, 4.0, 5.0, 6.0]),
    ];
    let result = assumptions::check(
        &samples,
        TestFamily::TwoIndependent,
        StudyDesign::Independent,
    );
    let homogeneity = result.homogeneity.as_ref().unwrap();
    assert!(homogeneity.passed);
    assert!(!result.homogeneity_failed());
}

#[test]
fn test_homogeneity_fails_for_unequal_spread() {
    let samples = [
        sample("a", vec![1.0, 2.0, 3.0, 4.0, 5.0]),
        sample("b", vec![10.0, 20.0, 30.0, 40.0, 50.0]),
    ];
    let result = assumptions::check(
        &samples,
        TestFamily::TwoIndependent,
        StudyDesign::Independent,
    );
    let homogeneity = result.homogeneity.as_ref().unwrap();
    assert!(!homogeneity.passed, "p = {}", homogeneity.p_value);
    assert!(result.homogeneity_failed());
}

#[test]
fn test_homogeneity_skipped_for_tiny_groups() {
    let samples = [sample("a", vec![1.0]), sample("b", vec![2.0, 3.0])];
    let result = assumptions::check(
        &samples,
        TestFamily::TwoIndependent,
        StudyDesign::Independent,
    );
    assert!(result.homogeneity.is_none());
}

// ===== Independence Tests =====

#[test]
fn test_independence_by_design() {
    let samples = [
        sample("a", vec![1.0, 2.0, 3.0]),
        sample("b", vec![2.0, 3.0, 4.0]),
    ];

    let independent = assumptions::check(
        &samples,
        TestFamily::TwoIndependent,
        StudyDesign::Independent,
    );
    assert!(independent.independence_passed);

    // Paired family models the dependence itself; variance equality is
    // not among its assumptions.
    let paired = assumptions::check(&samples, TestFamily::TwoPaired, StudyDesign::Paired);
    assert!(paired.independence_passed);
    assert!(paired.homogeneity.is_none());

    // Dependent design under a family that does not model it.
    let violated = assumptions::check(
        &samples,
        TestFamily::KIndependent,
        StudyDesign::RepeatedMeasures,
    );
    assert!(!violated.independence_passed);
    assert!(!violated.remediation_suggestions.is_empty());
}

// ===== Categorical Tests =====

#[test]
fn test_categorical_skips_distribution_checks() {
    let samples = [
        sample("a", vec![0.0, 1.0, 0.0, 1.0]),
        sample("b", vec![1.0, 1.0, 0.0, 0.0]),
    ];
    let result = assumptions::check(
        &samples,
        TestFamily::CategoricalAssociation,
        StudyDesign::Independent,
    );
    assert!(result.normality.is_empty());
    assert!(result.homogeneity.is_none());
    assert!(!result.any_failed());
}

// ===== Remediation Tests =====

#[test]
fn test_remediation_on_normality_failure() {
    let samples = [
        sample("a", vec![1.0, 1.1, 1.2, 1.3, 10.0]),
        sample("b", vec![2.0, 2.1, 2.2, 2.3, 20.0]),
    ];
    let result = assumptions::check(
        &samples,
        TestFamily::TwoIndependent,
        StudyDesign::Independent,
    );

    assert!(result.normality_failed());
    assert!(result
        .alternative_tests
        .contains(&TestProcedure::MannWhitneyU));
    // Every failure yields both a test alternative and a transformation.
    assert!(result.remediation_suggestions.len() >= 2);
    assert!(result
        .remediation_suggestions
        .iter()
        .any(|s| s.contains("transformation") || s.contains("transform")));
}

#[test]
fn test_remediation_on_homogeneity_failure() {
    let samples = [
        sample("a", normal_scores(15)),
        sample(
            "b",
            normal_scores(15).iter().map(|v| v * 20.0).collect(),
        ),
    ];
    let result = assumptions::check(
        &samples,
        TestFamily::TwoIndependent,
        StudyDesign::Independent,
    );

    assert!(!result.normality_failed());
    assert!(result.homogeneity_failed());
    assert!(result.alternative_tests.contains(&TestProcedure::WelchT));
}

#[test]
fn test_no_remediation_when_all_pass() {
    let samples = [
        sample("a", normal_scores(20)),
        sample("b", normal_scores(20).iter().map(|v| v + 1.0).collect()),
    ];
    let result = assumptions::check(
        &samples,
        TestFamily::TwoIndependent,
        StudyDesign::Independent,
    );
    assert!(!result.any_failed());
    assert!(result.remediation_suggestions.is_empty());
    assert!(result.alternative_tests.is_empty());
}
