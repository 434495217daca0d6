mod engine;
mod error;
mod viewer;

pub mod prelude {
    pub use crate::engine::{ChromeContext, ChromeEngine};
    pub use crate::error::BrowserClientError;
    pub use crate::viewer::{ViewerHandle, VIEWER_SELECTOR};
}
