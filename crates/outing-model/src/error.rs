use thiserror::Error;

/// Errors raised while building model values from scraped or user input.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unsupported URL scheme '{0}' (expected http or https)")]
    UnsupportedScheme(String),

    #[error("unknown day: {0}")]
    UnknownDay(String),

    #[error("invalid table slot value '{0}'")]
    InvalidTableSlot(String),

    #[error("invalid show time '{0}' (expected HH:MM)")]
    InvalidTime(String),

    #[error("no link matching '{key}' found on {page}")]
    MissingLink { key: String, page: String },
}
