//! report.rs
//!
//! Run statistics as an explicit result object, built by the driver and
//! handed to a standalone printer. Nothing here is process-global.

use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;

#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    /// Comments inserted into this file.
    pub annotated: usize,
    /// Time spent waiting on the generation service.
    pub generation: Duration,
    /// Full per-file time, including read/scan/write.
    pub elapsed: Duration,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub files: Vec<FileReport>,
    pub total_elapsed: Duration,
}

impl RunReport {
    pub fn total_annotated(&self) -> usize {
        self.files.iter().map(|f| f.annotated).sum()
    }

    pub fn total_generation(&self) -> Duration {
        self.files.iter().map(|f| f.generation).sum()
    }

    pub fn average_generation(&self) -> Option<Duration> {
        let annotated = self.total_annotated();
        if annotated == 0 {
            return None;
        }
        Some(self.total_generation() / annotated as u32)
    }
}

pub fn print_report(report: &RunReport) {
    println!();
    println!("{:<48} {:>6} {:>10}", "file", "tests", "elapsed");
    for f in &report.files {
        println!(
            "{:<48} {:>6} {:>9.2}s",
            f.path.display(),
            f.annotated,
            f.elapsed.as_secs_f64()
        );
    }

    println!();
    println!("files processed: {}", report.files.len());
    println!("tests annotated: {}", report.total_annotated());
    println!(
        "generation time: {:.2}s",
        report.total_generation().as_secs_f64()
    );
    if let Some(avg) = report.average_generation() {
        println!("avg per test:    {:.2}s", avg.as_secs_f64());
    }
    println!(
        "wall clock:      {:.2}s",
        report.total_elapsed.as_secs_f64()
    );
    println!("finished at:     {}", Utc::now().to_rfc3339());
}
