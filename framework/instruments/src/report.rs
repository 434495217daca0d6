mod arrow_file_report;
mod json_file_report;
mod summary_report;

use std::path::PathBuf;

use crate::TelemetryRecord;

pub use arrow_file_report::ArrowFileReportCollector;
pub use json_file_report::JsonFileReportCollector;
pub use summary_report::SummaryReportCollector;

/// A consumer of the finished record stream.
///
/// Collectors run once, after every runner has settled, over a snapshot of
/// the results sink. They never observe a run in progress.
pub trait ReportCollector {
    fn report(&self, records: &[TelemetryRecord]) -> anyhow::Result<()>;
}

/// Configure which reports should be produced at the end of a run.
#[derive(Debug, Default)]
pub struct ReportConfig {
    summary: bool,
    json_path: Option<PathBuf>,
    arrow_dir: Option<PathBuf>,
}

impl ReportConfig {
    /// Print a per-operation summary table to stdout.
    pub fn enable_summary(mut self) -> Self {
        self.summary = true;
        self
    }

    /// Write the flat record stream as a JSON array to `path`.
    pub fn enable_json_file(mut self, path: PathBuf) -> Self {
        self.json_path = Some(path);
        self
    }

    /// Write the record stream as an Arrow IPC file into `dir`.
    pub fn enable_arrow_file(mut self, dir: PathBuf) -> Self {
        self.arrow_dir = Some(dir);
        self
    }

    pub fn init(self) -> Reporter {
        let mut collectors: Vec<Box<dyn ReportCollector>> = Vec::new();

        if self.summary {
            collectors.push(Box::new(SummaryReportCollector::new()));
        }
        if let Some(path) = self.json_path {
            collectors.push(Box::new(JsonFileReportCollector::new(path)));
        }
        if let Some(dir) = self.arrow_dir {
            collectors.push(Box::new(ArrowFileReportCollector::new(dir)));
        }

        Reporter { collectors }
    }
}

pub struct Reporter {
    collectors: Vec<Box<dyn ReportCollector>>,
}

impl Reporter {
    /// Run every configured collector over the finished record stream.
    pub fn finalize(&self, records: &[TelemetryRecord]) -> anyhow::Result<()> {
        for collector in &self.collectors {
            collector.report(records)?;
        }

        Ok(())
    }
}
