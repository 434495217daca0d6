mod configs;
mod script;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use gust_browser::prelude::{ChromeContext, ChromeEngine, ViewerHandle};
use gust_instruments::report::ReportConfig;
use gust_instruments::ResultsSink;
use gust_runner::prelude::{
    init, Driver, DriverConfig, HarnessResult, OperationTimer, Scenario, StressTestCli,
};

/// Repeatedly churns a dashboard viewer through saved configurations,
/// attribute changes and resets, timing every step.
struct ViewerChurn {
    screenshot_root: PathBuf,
}

#[async_trait]
impl Scenario for ViewerChurn {
    type Context = ChromeContext;
    type Handle = ViewerHandle;

    async fn init(
        &self,
        context: &Self::Context,
        instance_name: &str,
        viewer_name: &str,
    ) -> anyhow::Result<Self::Handle> {
        ViewerHandle::attach(
            context,
            instance_name,
            viewer_name,
            self.screenshot_root.clone(),
        )
        .await
    }

    async fn run(&self, handle: &Self::Handle, timer: &mut OperationTimer) -> anyhow::Result<()> {
        script::churn(handle, timer).await
    }
}

fn main() -> HarnessResult<()> {
    let cli = init();

    let runtime = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;
    runtime.block_on(run(cli))
}

async fn run(cli: StressTestCli) -> HarnessResult<()> {
    let reporter = ReportConfig::default()
        .enable_summary()
        .enable_json_file(cli.out_dir.join("results.json"))
        .enable_arrow_file(cli.out_dir.clone())
        .init();

    let engine = ChromeEngine::launch(!cli.headful).await?;
    let scenario = Arc::new(ViewerChurn {
        screenshot_root: cli.screenshot_dir.clone(),
    });
    let sink = ResultsSink::new();

    let driver = Driver::new(engine, DriverConfig::from_cli(&cli));
    let outcome = driver.run(scenario, &sink).await;

    // The browser goes down whatever the outcome of the run.
    if let Err(e) = driver.into_provider().shutdown().await {
        log::warn!("Failed to shut down browser: {:#}", e);
    }

    let results = outcome?;

    for (instance, instance_results) in results.iter().enumerate() {
        let operations: usize = instance_results.values().map(Vec::len).sum();
        log::info!("Instance {} recorded {} operations", instance, operations);
    }

    reporter.finalize(&sink.snapshot())?;

    Ok(())
}
