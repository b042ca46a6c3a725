use outing_model::ModelError;
use thiserror::Error;

/// Everything that can abort a scraping run.
#[derive(Debug, Error)]
pub enum AcquireError {
    #[error("HTTP Error Response: {status} {reason} ({url})")]
    Http {
        status: u16,
        reason: String,
        url: String,
    },

    #[error("could not build HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("redirect from {0} has no usable Location header")]
    MissingLocation(String),

    #[error("malformed link '{href}' on {page}")]
    MalformedLink { href: String, page: String },

    #[error("invalid selector '{0}'")]
    Selector(String),

    #[error("no element matching '{selector}' found on {page}")]
    MissingElement { selector: String, page: String },

    #[error("could not decode data from {url}")]
    Data {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid source configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl AcquireError {
    pub(crate) fn transport(url: &url::Url, source: reqwest::Error) -> Self {
        Self::Transport {
            url: url.to_string(),
            source,
        }
    }
}
