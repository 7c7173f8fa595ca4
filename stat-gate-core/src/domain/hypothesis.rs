use serde::{Deserialize, Serialize};

use super::study::{OutcomeType, StudyDesign};

// ===== Test Families =====

/// High-level design family the planner hypothesises before any data is
/// inspected. The dispatcher refines a family into a concrete procedure.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TestFamily {
    TwoIndependent,
    TwoPaired,
    KIndependent,
    CategoricalAssociation,
}

impl TestFamily {
    pub fn accounts_for_dependence(&self) -> bool {
        matches!(self, TestFamily::TwoPaired)
    }

    /// The procedure run when every assumption holds.
    pub fn default_procedure(&self) -> TestProcedure {
        match self {
            TestFamily::TwoIndependent => TestProcedure::StudentT,
            TestFamily::TwoPaired => TestProcedure::PairedT,
            TestFamily::KIndependent => TestProcedure::OneWayAnova,
            TestFamily::CategoricalAssociation => TestProcedure::ChiSquareIndependence,
        }
    }
}

// ===== Design Signature =====

/// The combination of group count, pairing, and outcome type used to
/// select the applicable test family. Keeping this explicit makes the
/// supported-design set auditable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DesignSignature {
    pub group_count: usize,
    pub paired: bool,
    pub outcome_type: OutcomeType,
}

impl DesignSignature {
    pub fn from_study(group_count: usize, design: StudyDesign, outcome: OutcomeType) -> Self {
        Self {
            group_count,
            paired: design.is_dependent(),
            outcome_type: outcome,
        }
    }

    /// Map a signature onto its test family, if any is supported.
    pub fn family(&self) -> Option<TestFamily> {
        match (self.group_count, self.paired, self.outcome_type) {
            (2, false, OutcomeType::Continuous) => Some(TestFamily::TwoIndependent),
            (2, true, OutcomeType::Continuous) => Some(TestFamily::TwoPaired),
            (n, _, OutcomeType::Continuous) if n >= 3 => Some(TestFamily::KIndependent),
            (n, _, OutcomeType::Categorical) if n >= 2 => Some(TestFamily::CategoricalAssociation),
            _ => None,
        }
    }
}

// ===== Test Procedures =====

/// Concrete statistical procedures the dispatcher can execute.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TestProcedure {
    StudentT,
    WelchT,
    PairedT,
    MannWhitneyU,
    WilcoxonSignedRank,
    OneWayAnova,
    KruskalWallis,
    ChiSquareIndependence,
}

impl TestProcedure {
    pub fn name(&self) -> &'static str {
        match self {
            TestProcedure::StudentT => "Student's t-test",
            TestProcedure::WelchT => "Welch's t-test",
            TestProcedure::PairedT => "Paired t-test",
            TestProcedure::MannWhitneyU => "Mann-Whitney U test",
            TestProcedure::WilcoxonSignedRank => "Wilcoxon signed-rank test",
            TestProcedure::OneWayAnova => "One-way ANOVA",
            TestProcedure::KruskalWallis => "Kruskal-Wallis H test",
            TestProcedure::ChiSquareIndependence => "Chi-square test of independence",
        }
    }

    pub fn citation(&self) -> &'static str {
        match self {
            TestProcedure::StudentT => "Student (1908). The probable error of a mean.",
            TestProcedure::WelchT => {
                "Welch (1947). The generalization of Student's problem when several different population variances are involved."
            }
            TestProcedure::PairedT => "Student (1908). The probable error of a mean.",
            TestProcedure::MannWhitneyU => {
                "Mann & Whitney (1947). On a test of whether one of two random variables is stochastically larger than the other."
            }
            TestProcedure::WilcoxonSignedRank => {
                "Wilcoxon (1945). Individual comparisons by ranking methods."
            }
            TestProcedure::OneWayAnova => {
                "Fisher (1925). Statistical Methods for Research Workers."
            }
            TestProcedure::KruskalWallis => {
                "Kruskal & Wallis (1952). Use of ranks in one-criterion variance analysis."
            }
            TestProcedure::ChiSquareIndependence => {
                "Pearson (1900). On the criterion that a given system of deviations is such that it can be reasonably supposed to have arisen from random sampling."
            }
        }
    }

    pub fn is_parametric(&self) -> bool {
        matches!(
            self,
            TestProcedure::StudentT
                | TestProcedure::WelchT
                | TestProcedure::PairedT
                | TestProcedure::OneWayAnova
        )
    }

    /// The rank-based substitute executed when normality fails.
    pub fn nonparametric_alternative(&self) -> Option<TestProcedure> {
        match self {
            TestProcedure::StudentT | TestProcedure::WelchT => Some(TestProcedure::MannWhitneyU),
            TestProcedure::PairedT => Some(TestProcedure::WilcoxonSignedRank),
            TestProcedure::OneWayAnova => Some(TestProcedure::KruskalWallis),
            _ => None,
        }
    }

    /// The variance-robust correction executed when only homogeneity fails.
    pub fn variance_robust_alternative(&self) -> Option<TestProcedure> {
        match self {
            TestProcedure::StudentT => Some(TestProcedure::WelchT),
            TestProcedure::OneWayAnova => Some(TestProcedure::KruskalWallis),
            _ => None,
        }
    }
}

// ===== Test Result =====

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HypothesisTestResult {
    /// Display name of the procedure that actually ran.
    pub test_name: String,
    /// Procedure the planner intended before assumption checks.
    pub planned: TestProcedure,
    /// Procedure actually executed; differs from `planned` exactly when a
    /// substitution happened.
    pub executed: TestProcedure,
    pub statistic: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degrees_of_freedom: Option<f64>,
    pub p_value: f64,
    pub interpretation: String,
    pub citation: String,
}

impl HypothesisTestResult {
    pub fn was_substituted(&self) -> bool {
        self.planned != self.executed
    }

    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}
