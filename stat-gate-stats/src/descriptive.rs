use statrs::statistics::Statistics;

use stat_gate_core::{DescriptiveStats, EngineError, GroupSample, Result, StudyData};

/// Compute per-group descriptive statistics for one outcome variable.
///
/// Returns one record per distinct group in first-appearance order.
/// Missing values (NaN) are excluded from counts rather than failing, so
/// `count` may be lower than the number of supplied observations.
pub fn summarize(study: &StudyData, variable: &str) -> Result<Vec<DescriptiveStats>> {
    let samples = study.samples_for(variable)?;
    samples
        .iter()
        .map(|sample| summarize_group(variable, sample))
        .collect()
}

fn summarize_group(variable: &str, sample: &GroupSample) -> Result<DescriptiveStats> {
    if sample.values.is_empty() {
        return Err(EngineError::InsufficientData {
            variable: variable.to_string(),
            group: sample.group.clone(),
        });
    }

    let values = &sample.values;
    let mut sorted = values.clone();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    Ok(DescriptiveStats {
        variable: variable.to_string(),
        group: sample.group.clone(),
        count: values.len(),
        mean: values.mean(),
        std_dev: if values.len() > 1 { values.std_dev() } else { 0.0 },
        median: quantile(&sorted, 0.5),
        iqr: quantile(&sorted, 0.75) - quantile(&sorted, 0.25),
    })
}

/// Quantile of pre-sorted data by linear interpolation between closest
/// ranks (0.0 = min, 0.5 = median, 1.0 = max).
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let n = sorted.len();
    if q <= 0.0 {
        return sorted[0];
    }
    if q >= 1.0 {
        return sorted[n - 1];
    }

    let rank = q * (n - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;

    sorted[lower] * (1.0 - fraction) + sorted[upper] * fraction
}
