use async_trait::async_trait;
use url::Url;

/// The fixed viewport applied to every execution context in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
        }
    }
}

/// An isolated execution context, owned by exactly one iteration runner and
/// never shared across instances.
#[async_trait]
pub trait ExecutionContext: Send + Sync {
    /// Release the context. The runner calls this on every exit path, so a
    /// failed run still gives the context back.
    async fn close(&self) -> anyhow::Result<()>;
}

/// The capability to open isolated execution contexts, one per instance.
#[async_trait]
pub trait ContextProvider: Send + Sync {
    type Context: ExecutionContext + 'static;

    /// Open a fresh context sized to `viewport` and navigated to `url`.
    async fn open_context(&self, url: &Url, viewport: Viewport)
        -> anyhow::Result<Self::Context>;
}
