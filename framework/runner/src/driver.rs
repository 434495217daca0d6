use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use futures::future::join_all;
use gust_instruments::{InstanceResults, ResultsSink};
use url::Url;

use crate::cli::StressTestCli;
use crate::context::{ContextProvider, ExecutionContext, Viewport};
use crate::iteration::IterationRunner;
use crate::progress::iteration_progress;
use crate::scenario::Scenario;

/// Settings for one stress-test run.
#[derive(Debug, Clone)]
pub struct DriverConfig {
    pub url: Url,
    pub instances: usize,
    pub iterations: usize,
    pub viewport: Viewport,
    pub screenshot_root: PathBuf,
    pub no_progress: bool,
}

impl DriverConfig {
    pub fn from_cli(cli: &StressTestCli) -> Self {
        Self {
            url: cli.url.clone(),
            instances: cli.instances,
            iterations: cli.iterations,
            viewport: Viewport::default(),
            screenshot_root: cli.screenshot_dir.clone(),
            no_progress: cli.no_progress,
        }
    }
}

/// Fans a scenario out over N isolated execution contexts and aggregates the
/// per-instance results once every runner has settled.
pub struct Driver<P: ContextProvider> {
    provider: P,
    config: DriverConfig,
}

impl<P: ContextProvider> Driver<P> {
    pub fn new(provider: P, config: DriverConfig) -> Self {
        Self { provider, config }
    }

    /// Give the provider back so the caller can shut it down once the run
    /// has finished.
    pub fn into_provider(self) -> P {
        self.provider
    }

    /// Run `scenario` for the configured number of instances and iterations.
    ///
    /// Contexts are provisioned one at a time, then all runners start at
    /// once. Instances are identified by their provisioning order, `"0"`,
    /// `"1"`, and so on. Iterations within a runner stay strictly ordered and
    /// the results sink is the only state shared across runners.
    ///
    /// The run is all-or-nothing: if any runner fails, the first error is
    /// returned and partial results are discarded. Every context is released
    /// before this returns, whatever the outcome.
    pub async fn run<S>(
        &self,
        scenario: Arc<S>,
        sink: &ResultsSink,
    ) -> anyhow::Result<Vec<InstanceResults>>
    where
        S: Scenario<Context = P::Context> + 'static,
    {
        log::info!(
            "Running {} instances for {} iterations against \"{}\"",
            self.config.instances,
            self.config.iterations,
            self.config.url
        );

        let mut contexts = Vec::with_capacity(self.config.instances);
        for instance in 0..self.config.instances {
            let context = self
                .provider
                .open_context(&self.config.url, self.config.viewport)
                .await
                .with_context(|| format!("Failed to provision execution context {}", instance))?;
            contexts.push(context);
        }

        let progress = (!self.config.no_progress).then(|| {
            iteration_progress((self.config.instances * self.config.iterations) as u64)
        });

        let mut handles = Vec::with_capacity(contexts.len());
        for (instance, context) in contexts.into_iter().enumerate() {
            let runner = IterationRunner::new(
                instance.to_string(),
                self.config.iterations,
                sink.clone(),
                self.config.screenshot_root.clone(),
                progress.clone(),
            );
            let scenario = scenario.clone();

            handles.push(tokio::spawn(async move {
                let outcome = runner.run(&context, &scenario).await;

                // The context is released whether or not the iterations
                // succeeded.
                if let Err(e) = context.close().await {
                    log::warn!("Failed to close execution context: {:#}", e);
                }

                outcome
            }));
        }

        // Wait for every runner before surfacing an error so that each one
        // gets the chance to release its context.
        let outcomes = join_all(handles).await;

        if let Some(progress) = progress {
            progress.finish_and_clear();
        }

        let mut results = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            let instance_results = outcome.context("Iteration runner task panicked")??;
            results.push(instance_results);
        }

        Ok(results)
    }
}
