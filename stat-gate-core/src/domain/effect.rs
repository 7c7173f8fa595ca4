use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EffectMagnitude {
    Negligible,
    Small,
    Medium,
    Large,
}

impl EffectMagnitude {
    pub fn label(&self) -> &'static str {
        match self {
            EffectMagnitude::Negligible => "negligible",
            EffectMagnitude::Small => "small",
            EffectMagnitude::Medium => "medium",
            EffectMagnitude::Large => "large",
        }
    }
}

/// Standardized effect magnitude for the executed test family.
///
/// Exactly one of the magnitude-bearing fields is populated per family:
/// Cohen's d or Hedges' g for two-group comparisons, eta-squared for
/// k-group designs, none for categorical associations (explicitly "not
/// computed" rather than a misleading zero).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EffectSize {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cohens_d: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hedges_g: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eta_squared: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub magnitude: Option<EffectMagnitude>,
    pub interpretation: String,
}

impl EffectSize {
    pub fn not_computed(reason: impl Into<String>) -> Self {
        Self {
            cohens_d: None,
            hedges_g: None,
            eta_squared: None,
            magnitude: None,
            interpretation: reason.into(),
        }
    }

    /// The populated magnitude-bearing value, if any.
    pub fn value(&self) -> Option<f64> {
        self.cohens_d.or(self.hedges_g).or(self.eta_squared)
    }
}
