use std::time::Instant;

use chrono::Utc;
use gust_instruments::{ResultsSink, TelemetryRecord};

use crate::handle::{ViewerControl, ViewerOp};

/// Times one operation at a time on behalf of a single iteration runner.
///
/// The timer owns the runner's sequence counter. The counter advances exactly
/// once per attempt, success or failure, so operation numbers within one
/// instance's record stream are monotonic by one. Numbers are not unique
/// across instances.
pub struct OperationTimer {
    instance_name: String,
    sink: ResultsSink,
    sequence: u64,
}

impl OperationTimer {
    pub fn new(instance_name: String, sink: ResultsSink) -> Self {
        Self {
            instance_name,
            sink,
            sequence: 0,
        }
    }

    /// The number of operations attempted so far.
    pub fn operation_count(&self) -> u64 {
        self.sequence
    }

    /// Dispatch `op` through `handle` and record how long it took to settle.
    ///
    /// An operation failure is recorded, logged and swallowed so that the
    /// iteration keeps going. On success a screenshot of the current context
    /// state is captured before the record is appended; a screenshot failure
    /// is an orchestration failure and propagates.
    pub async fn timeit<H>(
        &mut self,
        description: &str,
        handle: &H,
        op: ViewerOp,
    ) -> anyhow::Result<()>
    where
        H: ViewerControl + ?Sized,
    {
        let started = Instant::now();
        let outcome = handle.dispatch(op).await;
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

        self.sequence += 1;

        match outcome {
            Ok(()) => {
                log::info!(
                    "{}: {} | {} | {} | {:.3}ms",
                    self.sequence,
                    self.instance_name,
                    handle.viewer_name(),
                    description,
                    elapsed_ms
                );

                handle
                    .screenshot(&screenshot_name(self.sequence, description))
                    .await?;

                self.sink.append(TelemetryRecord {
                    operation_number: self.sequence,
                    completed_at: Utc::now(),
                    instance_name: self.instance_name.clone(),
                    viewer_name: handle.viewer_name().to_string(),
                    description: description.to_string(),
                    elapsed_ms,
                    success: true,
                    error: None,
                });
            }
            Err(e) => {
                let record = TelemetryRecord {
                    operation_number: self.sequence,
                    completed_at: Utc::now(),
                    instance_name: self.instance_name.clone(),
                    viewer_name: handle.viewer_name().to_string(),
                    description: description.to_string(),
                    elapsed_ms,
                    success: false,
                    error: Some(format!("{:#}", e)),
                };

                log::error!(
                    "Operation '{}' failed with error: {:#}, debug data: {:?}",
                    description,
                    e,
                    record
                );

                self.sink.append(record);
            }
        }

        Ok(())
    }
}

/// Screenshots are named by the operation number and the description with
/// spaces replaced by underscores.
pub(crate) fn screenshot_name(sequence: u64, description: &str) -> String {
    format!("{}_{}", sequence, description.replace(' ', "_"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screenshot_names_embed_sequence_and_sanitized_description() {
        assert_eq!("1_Restore_config", screenshot_name(1, "Restore config"));
        assert_eq!("12_Reset", screenshot_name(12, "Reset"));
        assert_eq!(
            "3_Set_row_pivots_(deep)",
            screenshot_name(3, "Set row pivots (deep)")
        );
    }
}
