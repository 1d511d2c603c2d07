//! Command-line surface of `runtime-stats`.

use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

use crate::report::ReportRequest;

#[derive(Parser, Debug)]
#[command(name = "runtime-stats")]
#[command(version)]
#[command(about = "Run-time statistics for analysis types", long_about = None)]
pub struct Cli {
    /// Analysis type; reads {ANLS_TYPE}.csv
    #[arg(short = 'a', long = "anls-type", value_name = "STR")]
    pub anls_type: String,

    /// Target name (CHIPSEQ, WHOLE_GENOME, TRANSCRIPTOME, EXOME)
    #[arg(short = 't', long = "target-name", value_name = "STR")]
    pub target_name: String,

    /// Calculate stats using data created after a given date (YYYY-MM-DD)
    #[arg(long = "after-date", value_name = "STR")]
    pub after_date: Option<String>,

    /// Calculate stats using data created before a given date (YYYY-MM-DD)
    #[arg(long = "before-date", value_name = "STR")]
    pub before_date: Option<String>,

    /// Input directory
    #[arg(short = 'i', long = "input-dir", value_name = "STR")]
    pub input_dir: Option<PathBuf>,

    /// Output directory
    #[arg(short = 'o', long = "output-dir", value_name = "STR")]
    pub output_dir: Option<PathBuf>,

    /// Enable dry-run mode.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Enable verbose mode.
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Enable debug mode.
    #[arg(short = 'd', long)]
    pub debug: bool,
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        if self.debug {
            LevelFilter::Debug
        } else if self.verbose {
            LevelFilter::Info
        } else {
            LevelFilter::Warn
        }
    }

    /// Run configuration for an already validated target label.
    pub fn to_request(&self, target: &str) -> ReportRequest {
        ReportRequest {
            analysis_type: self.anls_type.clone(),
            target: target.to_string(),
            after_date: self.after_date.clone(),
            before_date: self.before_date.clone(),
            input_dir: self.input_dir.clone(),
            output_dir: self.output_dir.clone(),
            dry_run: self.dry_run,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_command_line() {
        let cli = Cli::try_parse_from([
            "runtime-stats",
            "-a",
            "tartan",
            "-t",
            "CHIPSEQ",
            "--after-date",
            "2020-01-01",
            "--before-date",
            "2020-06-30",
            "-i",
            "in",
            "-o",
            "out",
            "--dry-run",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.log_level(), LevelFilter::Info);

        let request = cli.to_request("CHIPSEQ");
        assert_eq!(request.analysis_type, "tartan");
        assert_eq!(request.after_date.as_deref(), Some("2020-01-01"));
        assert_eq!(request.before_date.as_deref(), Some("2020-06-30"));
        assert_eq!(request.input_dir, Some(PathBuf::from("in")));
        assert_eq!(request.output_dir, Some(PathBuf::from("out")));
        assert!(request.dry_run);
    }

    #[test]
    fn debug_wins_over_verbose() {
        let cli = Cli::try_parse_from(["runtime-stats", "-a", "x", "-t", "EXOME", "-v", "-d"]).unwrap();
        assert_eq!(cli.log_level(), LevelFilter::Debug);
    }

    #[test]
    fn analysis_type_and_target_are_required() {
        assert!(Cli::try_parse_from(["runtime-stats", "-a", "x"]).is_err());
        assert!(Cli::try_parse_from(["runtime-stats", "-t", "EXOME"]).is_err());
    }
}
