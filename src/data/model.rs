use std::fmt;
use std::str::FromStr;

use crate::error::ReportError;

// ---------------------------------------------------------------------------
// Target – the canonical sequencing target labels
// ---------------------------------------------------------------------------

/// Canonical target labels accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Target {
    Chipseq,
    WholeGenome,
    Transcriptome,
    Exome,
}

impl Target {
    pub const ALL: [Target; 4] = [
        Target::Chipseq,
        Target::WholeGenome,
        Target::Transcriptome,
        Target::Exome,
    ];

    /// The label as it appears in input files and output names.
    pub fn label(&self) -> &'static str {
        match self {
            Target::Chipseq => "CHIPSEQ",
            Target::WholeGenome => "WHOLE_GENOME",
            Target::Transcriptome => "TRANSCRIPTOME",
            Target::Exome => "EXOME",
        }
    }
}

impl FromStr for Target {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Target::ALL
            .into_iter()
            .find(|t| t.label() == s)
            .ok_or_else(|| ReportError::InvalidTarget(s.to_string()))
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// JobRecord – one row of the input file
// ---------------------------------------------------------------------------

/// Raw input row. Other columns in the file are ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct JobRecord {
    pub target_name: String,
    /// Timestamp text, date then time separated by whitespace.
    pub begin_date: String,
    /// Seconds.
    pub duration: f64,
}

// ---------------------------------------------------------------------------
// NormalizedRecord – JobRecord after renaming, date truncation and unit change
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    pub target_name: String,
    /// `YYYY-MM-DD`.
    pub begin_date: String,
    /// Hours.
    pub duration: f64,
}

// ---------------------------------------------------------------------------
// DailyAggregate – mean duration per date
// ---------------------------------------------------------------------------

/// Mean duration (hours) of one date's records.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyAggregate {
    pub date: String,
    pub duration: f64,
}

/// Date-ordered series of daily means.
///
/// The same type carries the full grouped series, the date window slice and
/// the outlier-free subset; each pipeline stage returns a new value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailySeries {
    pub rows: Vec<DailyAggregate>,
}

impl DailySeries {
    pub fn new(rows: Vec<DailyAggregate>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn durations(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.duration).collect()
    }

    pub fn dates(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.date.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_parses_canonical_labels_only() {
        for t in Target::ALL {
            assert_eq!(t.label().parse::<Target>().unwrap(), t);
        }
        let err = "chipseq".parse::<Target>().unwrap_err();
        assert_eq!(err.to_string(), "Error - invalid target name: chipseq");
    }

    #[test]
    fn series_accessors() {
        let series = DailySeries::new(vec![
            DailyAggregate { date: "2020-01-01".into(), duration: 1.0 },
            DailyAggregate { date: "2020-01-02".into(), duration: 2.5 },
        ]);
        assert_eq!(series.len(), 2);
        assert_eq!(series.durations(), vec![1.0, 2.5]);
        assert_eq!(series.dates(), vec!["2020-01-01", "2020-01-02"]);
    }
}
