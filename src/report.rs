use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};

use crate::chart;
use crate::data::filter::{group_by_date, normalize, remove_outliers, select_target, select_window};
use crate::data::loader::load_records;
use crate::data::model::DailySeries;
use crate::error::ReportError;
use crate::stats::{self, BoxSummary};

// ---------------------------------------------------------------------------
// Run configuration
// ---------------------------------------------------------------------------

/// Everything one report run needs. Built from the command line or directly
/// by library callers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportRequest {
    /// Selects `{analysis_type}.csv` and prefixes every output name.
    pub analysis_type: String,
    /// Canonical target label.
    pub target: String,
    /// Keep dates strictly after this `YYYY-MM-DD`.
    pub after_date: Option<String>,
    /// Keep dates up to and including this `YYYY-MM-DD`.
    pub before_date: Option<String>,
    /// Directory holding the input file; working directory when `None`.
    pub input_dir: Option<PathBuf>,
    /// Directory receiving the outputs; working directory when `None`.
    pub output_dir: Option<PathBuf>,
    /// Compute and log, but write nothing.
    pub dry_run: bool,
}

impl ReportRequest {
    pub fn new(analysis_type: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            analysis_type: analysis_type.into(),
            target: target.into(),
            ..Default::default()
        }
    }

    pub fn after_date(mut self, date: impl Into<String>) -> Self {
        self.after_date = Some(date.into());
        self
    }

    pub fn before_date(mut self, date: impl Into<String>) -> Self {
        self.before_date = Some(date.into());
        self
    }

    pub fn input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.input_dir = Some(dir.into());
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn input_path(&self) -> PathBuf {
        resolve(&self.input_dir, format!("{}.csv", self.analysis_type))
    }

    pub fn output_paths(&self) -> OutputPaths {
        let stem = format!("{}_{}", self.analysis_type, self.target);
        OutputPaths {
            report: resolve(&self.output_dir, format!("{stem}.txt")),
            boxplot: resolve(&self.output_dir, format!("{stem}_boxplot.png")),
            distribution: resolve(&self.output_dir, format!("{stem}_distribution.png")),
        }
    }

    /// Title of the distribution chart.
    pub fn chart_title(&self) -> String {
        format!("{} {} run time distribution", self.target, self.analysis_type)
    }
}

fn resolve(dir: &Option<PathBuf>, name: String) -> PathBuf {
    match dir {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputPaths {
    pub report: PathBuf,
    pub boxplot: PathBuf,
    pub distribution: PathBuf,
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Mean and sample standard deviation of daily durations, in hours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationStats {
    pub mean: f64,
    pub std: f64,
}

impl DurationStats {
    pub fn of(series: &DailySeries) -> Self {
        let durations = series.durations();
        Self {
            mean: stats::mean(&durations),
            std: stats::std_deviation(&durations),
        }
    }
}

impl fmt::Display for DurationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mean: {} hours\nstd: {} hours",
            format_hours(self.mean),
            format_hours(self.std)
        )
    }
}

/// Round to two decimals and print with at least one fractional digit;
/// undefined values print as `nan`.
pub fn format_hours(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let rounded = (value * 100.0).round() / 100.0;
    format!("{rounded:?}")
}

/// What a run computed and where it went.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub records: usize,
    pub target_records: usize,
    /// Daily means before date windowing.
    pub dates: usize,
    pub window: DailySeries,
    pub filtered: DailySeries,
    pub before: DurationStats,
    pub after: DurationStats,
    pub cap_low: f64,
    pub cap_high: f64,
    /// `None` on a dry run.
    pub outputs: Option<OutputPaths>,
}

// ---------------------------------------------------------------------------
// Text report
// ---------------------------------------------------------------------------

const HEADER_UNFILTERED: &str = "Without filtering outliers";
const HEADER_FILTERED: &str = "After filtering outliers";

fn write_unfiltered_section(path: &Path, stats: &DurationStats) -> Result<()> {
    let mut out = File::create(path)
        .with_context(|| format!("creating report {}", path.display()))?;
    write!(out, "{HEADER_UNFILTERED}\n{stats}\n\n")
        .with_context(|| format!("writing report {}", path.display()))?;
    Ok(())
}

fn append_filtered_section(path: &Path, stats: &DurationStats) -> Result<()> {
    let mut out = OpenOptions::new()
        .append(true)
        .open(path)
        .with_context(|| format!("opening report {}", path.display()))?;
    write!(out, "{HEADER_FILTERED}\n{stats}")
        .with_context(|| format!("writing report {}", path.display()))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Run the whole report: load, normalise, aggregate by date, window,
/// summarise, drop whisker outliers, summarise again, and write the text
/// report and both charts.
///
/// Nothing is written until the input has loaded completely, so a bad
/// duration leaves no partial outputs behind.
pub fn generate_report(request: &ReportRequest) -> Result<RunSummary> {
    if request.target.is_empty() {
        return Err(ReportError::InvalidTarget(String::new()).into());
    }
    let target = request.target.as_str();

    let input = request.input_path();
    let records = load_records(&input)?;
    info!("{}: {} records", input.display(), records.len());

    let normalized = normalize(&records, target);
    let selected = select_target(normalized, target);
    let target_records = selected.len();
    debug!("{target_records} records for target {target}");

    let grouped = group_by_date(&selected);
    let window = select_window(
        &grouped,
        request.after_date.as_deref(),
        request.before_date.as_deref(),
    );
    info!("{} of {} dates in window", window.len(), grouped.len());

    let before = DurationStats::of(&window);
    let summary = BoxSummary::new(&window.durations());
    let (cap_low, cap_high) = summary.caps();
    debug!("whisker caps [{cap_low}, {cap_high}]");

    let filtered = remove_outliers(&window, cap_low, cap_high);
    let after = DurationStats::of(&filtered);
    info!(
        "dropped {} outlier dates; mean {} -> {} hours",
        window.len() - filtered.len(),
        format_hours(before.mean),
        format_hours(after.mean)
    );

    let outputs = if request.dry_run {
        info!("dry run, no files written");
        None
    } else {
        let paths = request.output_paths();
        if let Some(dir) = &request.output_dir {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating output directory {}", dir.display()))?;
        }
        write_unfiltered_section(&paths.report, &before)?;
        chart::render_boxplot(&paths.boxplot, &summary)?;
        append_filtered_section(&paths.report, &after)?;
        chart::render_distribution(&paths.distribution, &filtered, &request.chart_title())?;
        Some(paths)
    };

    Ok(RunSummary {
        records: records.len(),
        target_records,
        dates: grouped.len(),
        window,
        filtered,
        before,
        after,
        cap_low,
        cap_high,
        outputs,
    })
}
