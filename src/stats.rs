//! Descriptive statistics over duration samples.
//!
//! Undefined results are `NaN` rather than `None`: an empty window is a
//! normal outcome and its statistics are reported verbatim. `NaN` inputs are
//! missing values and are skipped by every statistic here.

/// Whisker reach, in multiples of the interquartile range.
pub const WHISKER_IQR_FACTOR: f64 = 1.5;

fn present(data: &[f64]) -> Vec<f64> {
    data.iter().copied().filter(|v| !v.is_nan()).collect()
}

/// Arithmetic mean; `NaN` for an empty sample.
pub fn mean(data: &[f64]) -> f64 {
    let values = present(data);
    match values.len() {
        0 => f64::NAN,
        count => values.iter().sum::<f64>() / count as f64,
    }
}

/// Sample standard deviation (divisor `n - 1`); `NaN` below two values.
pub fn std_deviation(data: &[f64]) -> f64 {
    let values = present(data);
    let count = values.len();
    if count < 2 {
        return f64::NAN;
    }
    let data_mean = mean(&values);
    let variance = values
        .iter()
        .map(|value| {
            let diff = data_mean - value;
            diff * diff
        })
        .sum::<f64>()
        / (count - 1) as f64;
    variance.sqrt()
}

/// Percentile of an ascending-sorted sample by linear interpolation between
/// closest ranks. `p` is in `[0, 100]`.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let rank = (p / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let frac = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

/// Box-and-whisker summary of a sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxSummary {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub iqr: f64,
    /// Smallest value not below `q1 - 1.5 * iqr`, never above `q1`.
    pub whisker_low: f64,
    /// Largest value not above `q3 + 1.5 * iqr`, never below `q3`.
    pub whisker_high: f64,
}

impl BoxSummary {
    /// Summarise `data`; every field is `NaN` for an empty sample.
    pub fn new(data: &[f64]) -> Self {
        let mut sorted = present(data);
        if sorted.is_empty() {
            return Self {
                q1: f64::NAN,
                median: f64::NAN,
                q3: f64::NAN,
                iqr: f64::NAN,
                whisker_low: f64::NAN,
                whisker_high: f64::NAN,
            };
        }

        sorted.sort_by(f64::total_cmp);

        let q1 = percentile(&sorted, 25.0);
        let median = percentile(&sorted, 50.0);
        let q3 = percentile(&sorted, 75.0);
        let iqr = q3 - q1;

        let low_fence = q1 - WHISKER_IQR_FACTOR * iqr;
        let high_fence = q3 + WHISKER_IQR_FACTOR * iqr;

        let whisker_high = match sorted.iter().rev().copied().find(|v| *v <= high_fence) {
            Some(v) if v >= q3 => v,
            _ => q3,
        };
        let whisker_low = match sorted.iter().copied().find(|v| *v >= low_fence) {
            Some(v) if v <= q1 => v,
            _ => q1,
        };

        Self {
            q1,
            median,
            q3,
            iqr,
            whisker_low,
            whisker_high,
        }
    }

    /// `(cap_low, cap_high)`.
    pub fn caps(&self) -> (f64, f64) {
        (self.whisker_low, self.whisker_high)
    }
}

/// Lower and upper whisker endpoints of `data`, used as outlier thresholds.
pub fn whisker_bounds(data: &[f64]) -> (f64, f64) {
    BoxSummary::new(data).caps()
}
