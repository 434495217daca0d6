use thiserror::Error;

#[derive(Error, Debug)]
pub enum BrowserClientError {
    #[error("Failed to launch browser: {message}")]
    Launch { message: String },

    #[error("Failed to navigate to {url}: {source}")]
    Navigation {
        url: String,
        #[source]
        source: chromiumoxide::error::CdpError,
    },

    #[error("No element matching '{selector}' on the page: {source}")]
    ElementNotFound {
        selector: String,
        #[source]
        source: chromiumoxide::error::CdpError,
    },

    #[error("Failed to capture screenshot: {message}")]
    Screenshot { message: String },

    #[error("Viewer operation failed: {source}")]
    Operation {
        #[source]
        source: chromiumoxide::error::CdpError,
    },
}
