use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use gust_instruments::{InstanceResults, ResultsSink};
use indicatif::ProgressBar;

use crate::scenario::Scenario;
use crate::timer::OperationTimer;

/// Runs the configured number of iterations, strictly in order, against one
/// execution context.
///
/// All runner state is held here explicitly rather than captured by closures,
/// so each concurrent runner owns its own counter and shares nothing with its
/// siblings except the results sink.
pub(crate) struct IterationRunner {
    instance_name: String,
    iterations: usize,
    sink: ResultsSink,
    screenshot_root: PathBuf,
    progress: Option<ProgressBar>,
}

impl IterationRunner {
    pub(crate) fn new(
        instance_name: String,
        iterations: usize,
        sink: ResultsSink,
        screenshot_root: PathBuf,
        progress: Option<ProgressBar>,
    ) -> Self {
        Self {
            instance_name,
            iterations,
            sink,
            screenshot_root,
            progress,
        }
    }

    /// Run every iteration for this instance, then return the derived
    /// per-instance view over the sink.
    ///
    /// Errors from the scenario's `init`, from its orchestration logic or
    /// from screenshot-directory creation propagate and fail the run. Errors
    /// from the timed operations themselves are swallowed by the timer.
    pub(crate) async fn run<S>(
        &self,
        context: &S::Context,
        scenario: &Arc<S>,
    ) -> anyhow::Result<InstanceResults>
    where
        S: Scenario,
    {
        let started = Instant::now();
        let mut timer = OperationTimer::new(self.instance_name.clone(), self.sink.clone());

        for iteration in 0..self.iterations {
            log::info!(
                "Calling instance {} iteration {}",
                self.instance_name,
                iteration
            );

            let screenshot_dir = self
                .screenshot_root
                .join(format!("{}_{}", self.instance_name, iteration));
            tokio::fs::create_dir_all(&screenshot_dir)
                .await
                .with_context(|| {
                    format!(
                        "Failed to create screenshot directory {}",
                        screenshot_dir.display()
                    )
                })?;

            let handle = scenario
                .init(context, &self.instance_name, &iteration.to_string())
                .await?;
            scenario.run(&handle, &mut timer).await?;

            if let Some(progress) = &self.progress {
                progress.inc(1);
            }
        }

        log::info!(
            "Instance {} in {} iterations: performed {} operations in {:.3}s",
            self.instance_name,
            self.iterations,
            timer.operation_count(),
            started.elapsed().as_secs_f64()
        );

        Ok(self.sink.for_instance(&self.instance_name))
    }
}
