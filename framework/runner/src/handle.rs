use async_trait::async_trait;

/// The fixed set of remote operations a viewer handle supports.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerOp {
    /// Load a new data source into the viewer.
    Load(serde_json::Value),
    /// Restore the viewer to a saved configuration.
    Restore(serde_json::Value),
    /// Reset the viewer to its default configuration.
    Reset,
    /// Toggle the viewer's configuration panel.
    ToggleConfig,
    /// Read an attribute from the viewer element.
    GetAttribute(String),
    /// Write an attribute on the viewer element. Non-string values are
    /// JSON-encoded by the handle before being applied.
    SetAttribute {
        attribute: String,
        value: serde_json::Value,
    },
    /// Do nothing except wait for the viewer to settle.
    WaitForIdle,
}

/// Remote control over one running iteration's viewer.
///
/// A handle identifies itself by `(instance_name, viewer_name)` and is
/// created fresh for each iteration. `dispatch` resolves once the remote
/// state reports that it is no longer updating, so a resolved call means the
/// operation has settled.
#[async_trait]
pub trait ViewerControl: Send + Sync {
    fn instance_name(&self) -> &str;

    fn viewer_name(&self) -> &str;

    async fn dispatch(&self, op: ViewerOp) -> anyhow::Result<()>;

    /// Capture the current context state as a PNG named `name`.
    async fn screenshot(&self, name: &str) -> anyhow::Result<()>;
}
