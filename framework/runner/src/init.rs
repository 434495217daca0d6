use clap::Parser;

use crate::cli::StressTestCli;

/// Initialise the CLI and logging for the stress-test runner.
pub fn init() -> StressTestCli {
    env_logger::init();

    StressTestCli::parse()
}
