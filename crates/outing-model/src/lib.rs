pub mod availability;
pub mod correlate;
pub mod day;
pub mod error;
pub mod link_set;
pub mod outing;
pub mod start_url;

pub use availability::*;
pub use day::*;
pub use error::*;
pub use link_set::*;
pub use outing::*;
pub use start_url::*;
