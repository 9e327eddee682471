//! Tower layers for the HTTP client middleware stack

mod default_headers;

pub use default_headers::{DefaultHeadersLayer, DefaultHeadersService};
