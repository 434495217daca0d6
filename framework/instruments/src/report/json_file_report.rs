use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::Context;

use crate::report::ReportCollector;
use crate::TelemetryRecord;

/// Writes the flat record stream as a JSON array.
pub struct JsonFileReportCollector {
    path: PathBuf,
}

impl JsonFileReportCollector {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl ReportCollector for JsonFileReportCollector {
    fn report(&self, records: &[TelemetryRecord]) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create report directory {}", parent.display())
                })?;
            }
        }

        let file = File::create(&self.path)
            .with_context(|| format!("Failed to create {}", self.path.display()))?;
        serde_json::to_writer(BufWriter::new(file), records)
            .with_context(|| format!("Failed to write records to {}", self.path.display()))?;

        log::info!("Wrote {} records to {}", records.len(), self.path.display());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn writes_one_row_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");

        let records = (1..=3)
            .map(|n| TelemetryRecord {
                operation_number: n,
                completed_at: Utc::now(),
                instance_name: "0".to_string(),
                viewer_name: "0".to_string(),
                description: format!("op {}", n),
                elapsed_ms: n as f64,
                success: n != 2,
                error: (n == 2).then(|| "boom".to_string()),
            })
            .collect::<Vec<_>>();

        JsonFileReportCollector::new(path.clone())
            .report(&records)
            .unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<TelemetryRecord> = serde_json::from_str(&raw).unwrap();
        assert_eq!(records, parsed);
    }
}
