use thiserror::Error;

/// Domain failures of a report run.
///
/// I/O and csv errors travel as `anyhow` context chains; these variants are
/// the ones callers match on.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Error - invalid target name: {0}")]
    InvalidTarget(String),

    #[error("input is missing required column '{column}'")]
    MissingColumn { column: &'static str },

    #[error("line {line}: duration '{value}' is not a number")]
    InvalidDuration { line: u64, value: String },

    #[error("chart rendering failed: {0}")]
    Render(String),
}
