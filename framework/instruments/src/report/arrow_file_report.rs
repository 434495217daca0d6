use std::fs::File;
use std::path::PathBuf;

use anyhow::Context;
use polars::prelude::*;

use crate::report::ReportCollector;
use crate::TelemetryRecord;

/// Writes the record stream as an Arrow IPC file, one row per record.
///
/// The file lands in the configured directory as `results_<id>.arrow` so that
/// repeated runs never clobber each other.
pub struct ArrowFileReportCollector {
    dir: PathBuf,
}

impl ArrowFileReportCollector {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

pub(crate) fn records_to_frame(records: &[TelemetryRecord]) -> anyhow::Result<DataFrame> {
    let mut df = df!(
        "operation number" => records.iter().map(|r| r.operation_number as i64).collect::<Vec<_>>(),
        "completion timestamp" => records.iter().map(|r| r.completed_at.timestamp_millis()).collect::<Vec<_>>(),
        "instance name" => records.iter().map(|r| r.instance_name.clone()).collect::<Vec<_>>(),
        "iteration name" => records.iter().map(|r| r.viewer_name.clone()).collect::<Vec<_>>(),
        "description" => records.iter().map(|r| r.description.clone()).collect::<Vec<_>>(),
        "time taken (ms)" => records.iter().map(|r| r.elapsed_ms).collect::<Vec<_>>(),
        "success" => records.iter().map(|r| r.success).collect::<Vec<_>>(),
        "error" => records.iter().map(|r| r.error.clone()).collect::<Vec<_>>(),
    )?;

    let timestamps = df
        .column("completion timestamp")?
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
    df.replace("completion timestamp", timestamps.take_materialized_series())?;

    Ok(df)
}

impl ReportCollector for ArrowFileReportCollector {
    fn report(&self, records: &[TelemetryRecord]) -> anyhow::Result<()> {
        if !self.dir.exists() {
            std::fs::create_dir_all(&self.dir).with_context(|| {
                format!("Failed to create report directory {}", self.dir.display())
            })?;
        }

        let path = self
            .dir
            .join(format!("results_{}.arrow", nanoid::nanoid!(10)));

        let mut df = records_to_frame(records)?;
        let mut file = File::create(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        IpcWriter::new(&mut file)
            .finish(&mut df)
            .with_context(|| format!("Failed to write records to {}", path.display()))?;

        log::info!("Wrote {} rows to {}", df.height(), path.display());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_records(count: u64) -> Vec<TelemetryRecord> {
        (1..=count)
            .map(|n| TelemetryRecord {
                operation_number: n,
                completed_at: Utc::now(),
                instance_name: "0".to_string(),
                viewer_name: "0".to_string(),
                description: "Restore config".to_string(),
                elapsed_ms: 3.25 * n as f64,
                success: true,
                error: None,
            })
            .collect()
    }

    #[test]
    fn frame_has_one_row_per_record_and_a_datetime_column() {
        let df = records_to_frame(&sample_records(4)).unwrap();

        assert_eq!(4, df.height());
        assert_eq!(8, df.width());
        assert_eq!(
            &DataType::Datetime(TimeUnit::Milliseconds, None),
            df.column("completion timestamp").unwrap().dtype()
        );
    }

    #[test]
    fn written_file_round_trips_through_ipc() {
        let dir = tempfile::tempdir().unwrap();

        ArrowFileReportCollector::new(dir.path().to_path_buf())
            .report(&sample_records(3))
            .unwrap();

        let written = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .find(|path| path.extension().is_some_and(|ext| ext == "arrow"))
            .expect("No arrow file was written");

        let df = IpcReader::new(File::open(written).unwrap())
            .finish()
            .unwrap();
        assert_eq!(3, df.height());
        assert_eq!(8, df.width());
    }
}
