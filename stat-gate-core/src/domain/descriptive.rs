use serde::{Deserialize, Serialize};

/// Per-(variable, group) summary statistics. Derived solely from the
/// study data and immutable once computed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DescriptiveStats {
    pub variable: String,
    pub group: String,
    /// Valid (non-missing) observation count; may be lower than the number
    /// of supplied observations when missing values were dropped.
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub median: f64,
    pub iqr: f64,
}
