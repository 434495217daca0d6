mod cli;
mod context;
mod driver;
mod handle;
mod init;
mod iteration;
mod progress;
mod scenario;
mod timer;
mod types;

pub mod prelude {
    pub use crate::cli::StressTestCli;
    pub use crate::context::{ContextProvider, ExecutionContext, Viewport};
    pub use crate::driver::{Driver, DriverConfig};
    pub use crate::handle::{ViewerControl, ViewerOp};
    pub use crate::init::init;
    pub use crate::scenario::Scenario;
    pub use crate::timer::OperationTimer;
    pub use crate::types::HarnessResult;
}
