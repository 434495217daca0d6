use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::page::Page;
use futures::StreamExt;
use gust_runner::prelude::{ContextProvider, ExecutionContext, Viewport};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use url::Url;

use crate::error::BrowserClientError;

/// One headless Chromium process, shared by all execution contexts of a run.
///
/// Each context is an isolated tab; the engine owns the browser process and
/// the CDP event loop that keeps it responsive.
pub struct ChromeEngine {
    browser: Mutex<Browser>,
    handler_task: JoinHandle<()>,
}

impl ChromeEngine {
    /// Launch a browser. `headless` is disabled by the CLI's `--headful`
    /// flag when a visible window is wanted for debugging a scenario.
    pub async fn launch(headless: bool) -> anyhow::Result<Self> {
        let mut builder = BrowserConfig::builder();
        if !headless {
            builder = builder.with_head();
        }

        let config = builder
            .build()
            .map_err(|message| BrowserClientError::Launch { message })?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| BrowserClientError::Launch {
                message: e.to_string(),
            })?;

        // Drive CDP events until the browser goes away.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        Ok(Self {
            browser: Mutex::new(browser),
            handler_task,
        })
    }

    /// Close the browser process. Call this once the run has finished,
    /// whatever its outcome.
    pub async fn shutdown(self) -> anyhow::Result<()> {
        let mut browser = self.browser.into_inner();
        browser.close().await?;
        browser.wait().await?;
        self.handler_task.abort();

        Ok(())
    }
}

#[async_trait]
impl ContextProvider for ChromeEngine {
    type Context = ChromeContext;

    async fn open_context(
        &self,
        url: &Url,
        viewport: Viewport,
    ) -> anyhow::Result<Self::Context> {
        let page = {
            let browser = self.browser.lock().await;
            browser.new_page("about:blank").await?
        };

        page.execute(
            SetDeviceMetricsOverrideParams::builder()
                .width(viewport.width as i64)
                .height(viewport.height as i64)
                .device_scale_factor(1.0)
                .mobile(false)
                .build()
                .map_err(|e| anyhow::anyhow!("Invalid viewport parameters: {}", e))?,
        )
        .await?;

        page.goto(url.as_str())
            .await
            .map_err(|source| BrowserClientError::Navigation {
                url: url.to_string(),
                source,
            })?;
        page.wait_for_navigation().await?;

        log::debug!("Opened execution context at {}", url);

        Ok(ChromeContext { page })
    }
}

/// A fresh, isolated browser tab navigated to the target page. Owned by a
/// single iteration runner for the whole run.
pub struct ChromeContext {
    page: Page,
}

impl ChromeContext {
    pub fn page(&self) -> &Page {
        &self.page
    }
}

#[async_trait]
impl ExecutionContext for ChromeContext {
    async fn close(&self) -> anyhow::Result<()> {
        self.page.clone().close().await?;

        Ok(())
    }
}
