use async_trait::async_trait;

use crate::handle::ViewerControl;
use crate::timer::OperationTimer;

/// A scripted interaction to run against each execution context.
///
/// `init` is called once per iteration to produce a fresh viewer handle and
/// `run` then issues a bounded sequence of timed operations through that
/// handle. Errors returned by either hook are orchestration failures and fail
/// the whole run; errors inside individual timed operations are recorded by
/// the timer and never abort the iteration.
#[async_trait]
pub trait Scenario: Send + Sync {
    type Context: Send + Sync;
    type Handle: ViewerControl;

    /// Produce a fresh viewer handle for one iteration, identified by
    /// `(instance_name, viewer_name)` where the viewer name is the iteration
    /// index.
    async fn init(
        &self,
        context: &Self::Context,
        instance_name: &str,
        viewer_name: &str,
    ) -> anyhow::Result<Self::Handle>;

    /// Run the scripted operation sequence against `handle`.
    async fn run(&self, handle: &Self::Handle, timer: &mut OperationTimer) -> anyhow::Result<()>;
}
