use std::path::PathBuf;

use clap::Parser;
use url::Url;

pub const DEFAULT_URL: &str = "https://perspective-stresstest.herokuapp.com/";

/// Run a concurrent stress test against a remote dashboard page.
#[derive(Debug, Parser)]
#[command(about, long_about = None)]
pub struct StressTestCli {
    /// The URL to drive the test against
    #[clap(long, default_value = DEFAULT_URL)]
    pub url: Url,

    /// The number of browser tabs that will be opened concurrently
    #[clap(long, default_value_t = 5)]
    pub instances: usize,

    /// The number of times the script will be executed in each tab
    #[clap(long, default_value_t = 1)]
    pub iterations: usize,

    /// Directory where per-operation screenshots are stored
    #[clap(long, default_value = "screenshots")]
    pub screenshot_dir: PathBuf,

    /// Directory where result exports are written
    #[clap(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Run the browser with a visible window instead of headless
    #[clap(long, default_value = "false")]
    pub headful: bool,

    /// Do not show a progress bar on the CLI.
    ///
    /// This is recommended for CI/CD environments where the progress bar is
    /// just adding noise to the logs.
    #[clap(long, default_value = "false")]
    pub no_progress: bool,
}
