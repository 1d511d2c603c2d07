use std::collections::BTreeMap;

use log::debug;

use super::model::{DailyAggregate, DailySeries, JobRecord, NormalizedRecord};

pub const SECONDS_PER_HOUR: f64 = 3600.0;

// ---------------------------------------------------------------------------
// Normalisation: one NormalizedRecord per JobRecord
// ---------------------------------------------------------------------------

/// Rewrite every record: collapse target-name variants containing `target`
/// to `target`, keep only the date part of `begin_date`, and convert the
/// duration to hours. Records of other targets keep their name.
pub fn normalize(records: &[JobRecord], target: &str) -> Vec<NormalizedRecord> {
    records
        .iter()
        .map(|rec| NormalizedRecord {
            target_name: if rec.target_name.contains(target) {
                target.to_string()
            } else {
                rec.target_name.clone()
            },
            begin_date: date_part(&rec.begin_date).to_string(),
            duration: rec.duration / SECONDS_PER_HOUR,
        })
        .collect()
}

/// First whitespace-delimited token of a timestamp.
pub fn date_part(timestamp: &str) -> &str {
    timestamp.split_whitespace().next().unwrap_or("")
}

/// Keep records whose (normalised) target equals `target` exactly.
pub fn select_target(records: Vec<NormalizedRecord>, target: &str) -> Vec<NormalizedRecord> {
    records
        .into_iter()
        .filter(|rec| rec.target_name == target)
        .collect()
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Mean duration per date, ascending by date.
///
/// Dates compare as strings, which orders correctly for `YYYY-MM-DD`.
/// Missing (`NaN`) durations are left out of the mean; a date with no
/// usable duration is kept with a `NaN` mean.
pub fn group_by_date(records: &[NormalizedRecord]) -> DailySeries {
    let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for rec in records {
        let entry = groups.entry(rec.begin_date.as_str()).or_insert((0.0, 0));
        if !rec.duration.is_nan() {
            entry.0 += rec.duration;
            entry.1 += 1;
        }
    }

    let rows = groups
        .into_iter()
        .map(|(date, (sum, count))| DailyAggregate {
            date: date.to_string(),
            duration: if count == 0 { f64::NAN } else { sum / count as f64 },
        })
        .collect::<Vec<_>>();
    debug!("grouped {} records into {} dates", records.len(), rows.len());
    DailySeries::new(rows)
}

// ---------------------------------------------------------------------------
// Date window
// ---------------------------------------------------------------------------

/// Half-open index range `[start, end)` of a date-sorted series.
///
/// * `start` is the first position whose date is strictly after `after_date`,
///   or 0 without `after_date`. When `after_date` is given but no date
///   exceeds it, `start` is 1, not 0: the first row is skipped. Existing
///   reports depend on this.
/// * `end` is the first position whose date is strictly after
///   `before_date`, or the series length without `before_date`.
pub fn window_bounds(
    series: &DailySeries,
    after_date: Option<&str>,
    before_date: Option<&str>,
) -> (usize, usize) {
    let first_after = |bound: &str| series.rows.iter().position(|r| r.date.as_str() > bound);

    let start = match after_date {
        Some(after) => first_after(after).unwrap_or(1),
        None => 0,
    };
    let end = match before_date {
        Some(before) => first_after(before).unwrap_or(series.len()),
        None => series.len(),
    };
    (start, end)
}

/// Slice the series to its date window. An inverted or out-of-range window
/// yields an empty series.
pub fn select_window(
    series: &DailySeries,
    after_date: Option<&str>,
    before_date: Option<&str>,
) -> DailySeries {
    let (start, end) = window_bounds(series, after_date, before_date);
    let end = end.min(series.len());
    if start >= end {
        debug!("empty date window [{start}, {end})");
        return DailySeries::default();
    }
    DailySeries::new(series.rows[start..end].to_vec())
}

// ---------------------------------------------------------------------------
// Outliers
// ---------------------------------------------------------------------------

/// Drop rows above `cap_high` or below `cap_low`. `NaN` caps drop nothing,
/// and rows with a `NaN` mean are kept.
pub fn remove_outliers(series: &DailySeries, cap_low: f64, cap_high: f64) -> DailySeries {
    let rows = series
        .rows
        .iter()
        .filter(|r| {
            let outlier_high = r.duration > cap_high;
            let outlier_low = r.duration < cap_low;
            !(outlier_high || outlier_low)
        })
        .cloned()
        .collect();
    DailySeries::new(rows)
}
