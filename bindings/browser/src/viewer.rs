use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use base64::Engine as _;
use chromiumoxide::cdp::browser_protocol::page::{
    CaptureScreenshotFormat, CaptureScreenshotParams,
};
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use gust_runner::prelude::{ViewerControl, ViewerOp};

use crate::engine::ChromeContext;
use crate::error::BrowserClientError;

/// The dashboard custom element this harness drives.
pub const VIEWER_SELECTOR: &str = "perspective-viewer";

const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A thin wrapper around the dashboard element's own API.
///
/// Operations are dispatched by evaluating the element's method in-page and
/// then waiting until the element stops reporting the `updating` attribute,
/// so a resolved dispatch means the requested change has settled. There is
/// deliberately no per-operation timeout; a page that never settles hangs its
/// instance.
pub struct ViewerHandle {
    page: Page,
    element: Element,
    instance_name: String,
    viewer_name: String,
    screenshot_root: PathBuf,
}

impl ViewerHandle {
    /// Locate the viewer element on an already-navigated context.
    pub async fn attach(
        context: &ChromeContext,
        instance_name: &str,
        viewer_name: &str,
        screenshot_root: PathBuf,
    ) -> anyhow::Result<Self> {
        let page = context.page().clone();
        let element =
            page.find_element(VIEWER_SELECTOR)
                .await
                .map_err(|source| BrowserClientError::ElementNotFound {
                    selector: VIEWER_SELECTOR.to_string(),
                    source,
                })?;

        Ok(Self {
            page,
            element,
            instance_name: instance_name.to_string(),
            viewer_name: viewer_name.to_string(),
            screenshot_root,
        })
    }

    /// Resolves once the element no longer carries the `updating` attribute.
    async fn wait_for_idle(&self) -> anyhow::Result<()> {
        let idle_selector = format!("{}:not([updating])", VIEWER_SELECTOR);
        loop {
            if self.page.find_element(&idle_selector).await.is_ok() {
                return Ok(());
            }
            tokio::time::sleep(IDLE_POLL_INTERVAL).await;
        }
    }
}

#[async_trait]
impl ViewerControl for ViewerHandle {
    fn instance_name(&self) -> &str {
        &self.instance_name
    }

    fn viewer_name(&self) -> &str {
        &self.viewer_name
    }

    async fn dispatch(&self, op: ViewerOp) -> anyhow::Result<()> {
        if let Some(script) = op_script(&op) {
            self.element
                .call_js_fn(script, true)
                .await
                .map_err(|source| BrowserClientError::Operation { source })?;
        }

        self.wait_for_idle().await
    }

    async fn screenshot(&self, name: &str) -> anyhow::Result<()> {
        let path = screenshot_path(
            &self.screenshot_root,
            &self.instance_name,
            &self.viewer_name,
            name,
        );

        let response = self
            .page
            .execute(
                CaptureScreenshotParams::builder()
                    .format(CaptureScreenshotFormat::Png)
                    .build(),
            )
            .await
            .map_err(|e| BrowserClientError::Screenshot {
                message: e.to_string(),
            })?;

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(&response.data)
            .map_err(|e| BrowserClientError::Screenshot {
                message: e.to_string(),
            })?;

        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("Failed to write screenshot {}", path.display()))?;

        Ok(())
    }
}

/// The in-page function evaluated against the viewer element for `op`, or
/// `None` when the operation only waits.
fn op_script(op: &ViewerOp) -> Option<String> {
    match op {
        ViewerOp::Load(data) => Some(format!("async function() {{ await this.load({}); }}", data)),
        ViewerOp::Restore(config) => Some(format!(
            "async function() {{ await this.restore({}); }}",
            config
        )),
        ViewerOp::Reset => Some("async function() { await this.reset(); }".to_string()),
        ViewerOp::ToggleConfig => {
            Some("async function() { await this.toggleConfig(); }".to_string())
        }
        ViewerOp::GetAttribute(attribute) => Some(format!(
            "function() {{ return this.getAttribute({}); }}",
            serde_json::Value::String(attribute.clone())
        )),
        ViewerOp::SetAttribute { attribute, value } => {
            // Attribute values are strings on the element, so anything else
            // is JSON-encoded first.
            let value = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };

            Some(format!(
                "function() {{ this.setAttribute({}, {}); }}",
                serde_json::Value::String(attribute.clone()),
                serde_json::Value::String(value)
            ))
        }
        ViewerOp::WaitForIdle => None,
    }
}

fn screenshot_path(root: &Path, instance_name: &str, viewer_name: &str, name: &str) -> PathBuf {
    root.join(format!("{}_{}", instance_name, viewer_name))
        .join(format!("{}.png", name))
}
