use std::path::PathBuf;

use thiserror::Error;

/// Failures while loading site content, persisting settings or handing a
/// form submission off to the browser.
#[derive(Debug, Error)]
pub enum SiteError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("embedded content file `{0}` not found")]
    MissingContent(String),

    #[error("invalid form endpoint `{endpoint}`: {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    #[error("could not open browser: {0}")]
    Browser(#[source] std::io::Error),
}

impl SiteError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = SiteError> = std::result::Result<T, E>;
