pub mod chart;
pub mod cli;
pub mod data;
pub mod error;
pub mod report;
pub mod stats;

pub use data::model::Target;
pub use error::ReportError;
pub use report::{generate_report, ReportRequest, RunSummary};
