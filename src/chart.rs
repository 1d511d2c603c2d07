use std::path::Path;
use std::sync::OnceLock;

use log::debug;
use plotters::prelude::*;
use plotters::style::{register_font, FontStyle};

use crate::data::model::DailySeries;
use crate::error::ReportError;
use crate::stats::BoxSummary;

/// Output image size in pixels.
pub const CHART_SIZE: (u32, u32) = (640, 480);

/// Date-label spacing base: the label step is `(len - 1) / (MAX_DATE_TICKS - 1)`.
/// Short series whose step rounds down get more labels than this.
pub const MAX_DATE_TICKS: usize = 6;

/// DejaVu Sans, registered as the `sans-serif` family every chart label uses.
static SANS_SERIF: &[u8] = include_bytes!("../assets/fonts/DejaVuSans.ttf");

fn render_err<E: std::fmt::Display>(err: E) -> ReportError {
    ReportError::Render(err.to_string())
}

/// Register the bundled font once per process. Must run before any text is
/// laid out.
fn ensure_fonts() -> Result<(), ReportError> {
    static REGISTERED: OnceLock<bool> = OnceLock::new();
    let ok = *REGISTERED
        .get_or_init(|| register_font("sans-serif", FontStyle::Normal, SANS_SERIF).is_ok());
    if ok {
        Ok(())
    } else {
        Err(ReportError::Render("bundled font could not be parsed".to_string()))
    }
}

/// Padded y-axis range covering `values`; `0..1` when nothing is finite.
fn value_range(values: impl IntoIterator<Item = f64>) -> std::ops::Range<f64> {
    let (min, max) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if min > max {
        return 0.0..1.0;
    }
    let pad = if max - min < f64::EPSILON {
        0.5
    } else {
        (max - min) * 0.05
    };
    (min - pad)..(max + pad)
}

/// Runs of consecutive defined durations as `(position, hours)`; a `NaN`
/// date breaks the line.
fn line_segments(series: &DailySeries) -> Vec<Vec<(i32, f64)>> {
    let mut segments = vec![Vec::new()];
    for (i, row) in series.rows.iter().enumerate() {
        if row.duration.is_nan() {
            if segments.last().is_some_and(|s| !s.is_empty()) {
                segments.push(Vec::new());
            }
        } else if let Some(current) = segments.last_mut() {
            current.push((i as i32, row.duration));
        }
    }
    segments.retain(|s| !s.is_empty());
    segments
}

/// Positions of the date labels: `1, 1 + step, ..` below `len`, with
/// `step = max(1, (len - 1) / 5)`.
pub fn date_ticks(len: usize) -> Vec<usize> {
    let step = (len.saturating_sub(1) / (MAX_DATE_TICKS - 1)).max(1);
    (1..len).step_by(step).collect()
}

// ---------------------------------------------------------------------------
// Box plot
// ---------------------------------------------------------------------------

/// Draw a single box-and-whisker glyph. Points beyond the whiskers are not
/// drawn.
pub fn render_boxplot(path: &Path, summary: &BoxSummary) -> Result<(), ReportError> {
    ensure_fonts()?;
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let y_range = value_range([summary.whisker_low, summary.whisker_high]);
    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(0.0..2.0, y_range)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(3)
        .x_label_formatter(&|x: &f64| {
            if (x - 1.0).abs() < 1e-9 {
                "duration".to_string()
            } else {
                String::new()
            }
        })
        .draw()
        .map_err(render_err)?;

    if summary.q1.is_nan() {
        debug!("box plot of empty sample, drawing axes only");
    } else {
        let (left, center, right) = (0.75, 1.0, 1.25);
        let (cap_left, cap_right) = (0.875, 1.125);

        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(left, summary.q1), (right, summary.q3)],
                BLUE.stroke_width(2),
            )))
            .map_err(render_err)?;

        let whisker_style = BLACK.stroke_width(1);
        chart
            .draw_series(vec![
                PathElement::new(
                    vec![(center, summary.q3), (center, summary.whisker_high)],
                    whisker_style,
                ),
                PathElement::new(
                    vec![(center, summary.q1), (center, summary.whisker_low)],
                    whisker_style,
                ),
                PathElement::new(
                    vec![(cap_left, summary.whisker_high), (cap_right, summary.whisker_high)],
                    whisker_style,
                ),
                PathElement::new(
                    vec![(cap_left, summary.whisker_low), (cap_right, summary.whisker_low)],
                    whisker_style,
                ),
                PathElement::new(
                    vec![(left, summary.median), (right, summary.median)],
                    GREEN.stroke_width(2),
                ),
            ])
            .map_err(render_err)?;
    }

    root.present().map_err(render_err)?;
    debug!("wrote {}", path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Distribution line chart
// ---------------------------------------------------------------------------

/// Line chart of daily durations against their position, labelled with
/// dates at [`date_ticks`]. Dates without a usable duration are skipped.
pub fn render_distribution(
    path: &Path,
    series: &DailySeries,
    title: &str,
) -> Result<(), ReportError> {
    ensure_fonts()?;
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let len = series.len();
    let last = (len.saturating_sub(1) as i32).max(1);
    let ticks = date_ticks(len).into_iter().map(|i| i as i32).collect();
    let dates = series.dates();

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 20))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(
            (0..last).with_key_points(ticks),
            value_range(series.durations()),
        )
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_desc("Begin Date")
        .y_desc("Hour")
        .x_label_formatter(&|idx| {
            usize::try_from(*idx)
                .ok()
                .and_then(|i| dates.get(i))
                .map(|d| d.to_string())
                .unwrap_or_default()
        })
        .draw()
        .map_err(render_err)?;

    for segment in line_segments(series) {
        chart
            .draw_series(LineSeries::new(segment, &BLUE))
            .map_err(render_err)?;
    }

    root.present().map_err(render_err)?;
    debug!("wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::DailyAggregate;
    use tempfile::TempDir;

    fn series(values: &[f64]) -> DailySeries {
        DailySeries::new(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| DailyAggregate {
                    date: format!("2020-01-{:02}", i + 1),
                    duration: *v,
                })
                .collect(),
        )
    }

    fn assert_png(path: &Path) {
        assert_eq!(image::image_dimensions(path).unwrap(), CHART_SIZE);
    }

    #[test]
    fn boxplot_renders_with_labels() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("box.png");
        render_boxplot(&path, &BoxSummary::new(&[1.0, 1.2, 0.9, 5.0, 1.1])).unwrap();
        assert_png(&path);
    }

    #[test]
    fn boxplot_of_empty_and_single_samples() {
        let dir = TempDir::new().unwrap();
        let empty = dir.path().join("empty.png");
        render_boxplot(&empty, &BoxSummary::new(&[])).unwrap();
        assert_png(&empty);

        let single = dir.path().join("single.png");
        render_boxplot(&single, &BoxSummary::new(&[2.5])).unwrap();
        assert_png(&single);
    }

    #[test]
    fn distribution_renders_for_any_length() {
        let dir = TempDir::new().unwrap();
        for len in [0usize, 1, 2, 7, 40] {
            let values: Vec<f64> = (0..len).map(|i| 1.0 + (i % 5) as f64 * 0.1).collect();
            let path = dir.path().join(format!("dist_{len}.png"));
            render_distribution(&path, &series(&values), "CHIPSEQ tartan run time distribution")
                .unwrap();
            assert_png(&path);
        }
    }

    #[test]
    fn distribution_skips_undefined_durations() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gaps.png");
        render_distribution(&path, &series(&[1.0, f64::NAN, 2.0]), "gaps").unwrap();
        assert_png(&path);
    }

    #[test]
    fn missing_durations_break_the_line() {
        let segments = line_segments(&series(&[1.0, 2.0, f64::NAN, f64::NAN, 3.0]));
        assert_eq!(segments, vec![vec![(0, 1.0), (1, 2.0)], vec![(4, 3.0)]]);
        assert!(line_segments(&series(&[f64::NAN])).is_empty());
        assert!(line_segments(&DailySeries::default()).is_empty());
    }

    #[test]
    fn ticks_start_at_one_and_are_evenly_spaced() {
        assert_eq!(date_ticks(0), Vec::<usize>::new());
        assert_eq!(date_ticks(1), Vec::<usize>::new());
        assert_eq!(date_ticks(4), vec![1, 2, 3]);
        // step 1 below eleven dates, so every date past the first is labelled
        assert_eq!(date_ticks(10), (1..10).collect::<Vec<_>>());
        assert_eq!(date_ticks(11), vec![1, 3, 5, 7, 9]);
        assert_eq!(date_ticks(26), vec![1, 6, 11, 16, 21]);
    }

    #[test]
    fn value_range_pads_flat_and_empty_data() {
        assert_eq!(value_range(Vec::new()), 0.0..1.0);
        assert_eq!(value_range([f64::NAN]), 0.0..1.0);
        assert_eq!(value_range([2.0, 2.0]), 1.5..2.5);
        let r = value_range([0.0, 10.0]);
        assert!((r.start + 0.5).abs() < 1e-9 && (r.end - 10.5).abs() < 1e-9);
    }
}
