//! Writes a synthetic job-duration file for trying out `runtime-stats`.
//!
//! Usage: `generate_sample [OUTPUT]` (default `tartan.csv`).

use anyhow::{Context, Result};

/// SplitMix64 stream; same seed, same file.
struct JobRng(u64);

impl JobRng {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)`.
    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    fn pick(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    /// Normal sample via Box-Muller.
    fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        let radius = (-2.0 * (1.0 - self.unit()).ln()).sqrt();
        let angle = std::f64::consts::TAU * self.unit();
        mean + std_dev * radius * angle.cos()
    }
}

/// `YYYY-MM-DD` for a day count since 1970-01-01.
fn civil_date(days: i64) -> String {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + i64::from(month <= 2);
    format!("{year:04}-{month:02}-{day:02}")
}

fn main() -> Result<()> {
    let output_path = std::env::args().nth(1).unwrap_or_else(|| "tartan.csv".to_string());
    let mut rng = JobRng(42);

    // 2020-01-01
    let first_day: i64 = 18_262;
    let num_days = 180;

    // (raw target-name variants, typical hours, spread)
    let targets: [(&[&str], f64, f64); 4] = [
        (&["CHIPSEQ", "CHIPSEQ_v2", "HISTONE_CHIPSEQ"], 6.0, 0.8),
        (&["WHOLE_GENOME", "WHOLE_GENOME_30X"], 30.0, 4.0),
        (&["TRANSCRIPTOME", "TRANSCRIPTOME_PE"], 4.0, 0.5),
        (&["EXOME"], 10.0, 1.5),
    ];

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(&output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record(["job_id", "target_name", "begin_date", "duration"])?;

    let mut job_id: u64 = 0;
    for day in 0..num_days {
        let date = civil_date(first_day + day);
        for (variants, hours, spread) in &targets {
            let runs = 1 + rng.pick(3);
            for _ in 0..runs {
                let name = variants[rng.pick(variants.len())];
                let mut duration_hours = rng.normal(*hours, *spread).max(0.1);
                // stuck or crashed runs, and the odd unrecorded one
                let mut recorded = true;
                match rng.pick(100) {
                    0 | 1 => duration_hours *= 4.0,
                    2 | 3 => duration_hours *= 0.1,
                    4 => recorded = false,
                    _ => {}
                }
                let time = format!(
                    "{:02}:{:02}:{:02}",
                    rng.pick(24),
                    rng.pick(60),
                    rng.pick(60)
                );
                writer.write_record([
                    job_id.to_string(),
                    name.to_string(),
                    format!("{date} {time}"),
                    if recorded {
                        format!("{:.0}", duration_hours * 3600.0)
                    } else {
                        String::new()
                    },
                ])?;
                job_id += 1;
            }
        }
    }
    writer.flush()?;

    println!("Wrote {job_id} job records over {num_days} days to {output_path}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let (mut a, mut b) = (JobRng(42), JobRng(42));
        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
        assert_ne!(JobRng(1).next_u64(), JobRng(2).next_u64());
    }

    #[test]
    fn draws_stay_in_range() {
        let mut rng = JobRng(7);
        for _ in 0..1000 {
            let u = rng.unit();
            assert!((0.0..1.0).contains(&u));
            assert!(rng.pick(3) < 3);
            assert!(rng.normal(6.0, 0.8).is_finite());
        }
    }

    #[test]
    fn civil_dates() {
        assert_eq!(civil_date(0), "1970-01-01");
        assert_eq!(civil_date(18_262), "2020-01-01");
        assert_eq!(civil_date(18_262 + 59), "2020-02-29");
    }
}
