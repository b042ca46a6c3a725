pub mod calendar;
pub mod cinema;
pub mod config;
pub mod dinner;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod plan;
pub mod start_page;

pub use config::SourceConfig;
pub use error::AcquireError;
pub use fetch::{FetchOptions, Fetcher, Page};
pub use plan::plan;
