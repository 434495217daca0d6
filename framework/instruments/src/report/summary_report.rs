mod operations_table;

use std::collections::HashMap;

use tabled::settings::Style;
use tabled::Table;

use crate::report::summary_report::operations_table::OperationRow;
use crate::report::ReportCollector;
use crate::TelemetryRecord;

/// Prints a summary of the run to stdout, grouped by operation description.
pub struct SummaryReportCollector;

impl SummaryReportCollector {
    pub fn new() -> Self {
        Self
    }

    fn print_summary_of_operations(&self, records: &[TelemetryRecord]) {
        println!("\nSummary of operations");
        let rows = records
            .iter()
            .fold(HashMap::new(), |mut acc, record| {
                match acc.entry(record.description.clone()) {
                    std::collections::hash_map::Entry::Vacant(entry) => {
                        entry.insert(vec![record]);
                    }
                    std::collections::hash_map::Entry::Occupied(mut entry) => {
                        entry.get_mut().push(record);
                    }
                }
                acc
            })
            .into_iter()
            .map(|(description, records)| {
                let attempts = records.len();
                let failed = records.iter().filter(|r| !r.success).count();
                let total_ms = records.iter().map(|r| r.elapsed_ms).sum::<f64>();
                let succeeded = records
                    .iter()
                    .filter(|r| r.success)
                    .map(|r| r.elapsed_ms)
                    .collect::<Vec<_>>();

                OperationRow {
                    description,
                    attempts,
                    failed,
                    total_ms,
                    avg_ms: total_ms / attempts as f64,
                    min_ms: succeeded.iter().copied().fold(f64::NAN, f64::min),
                    max_ms: succeeded.iter().copied().fold(f64::NAN, f64::max),
                }
            })
            .collect::<Vec<_>>();

        let mut table = Table::new(&rows);
        table.with(Style::modern());

        println!("{}", table);
    }
}

impl Default for SummaryReportCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportCollector for SummaryReportCollector {
    fn report(&self, records: &[TelemetryRecord]) -> anyhow::Result<()> {
        if records.is_empty() {
            println!("\nNo operations were recorded");
            return Ok(());
        }

        self.print_summary_of_operations(records);

        Ok(())
    }
}
