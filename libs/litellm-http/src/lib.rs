#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![warn(warnings)]

//! HTTP client for talking to a LiteLLM proxy
//!
//! A hyper-based client with:
//! - TLS via rustls (HTTPS only unless explicitly relaxed)
//! - Connection pooling
//! - A per-request timeout
//! - Default headers (User-Agent, API key) injected by a tower layer
//! - Transparent response decompression with body size limits
//!
//! Requests are sent exactly once. There is no retry layer: callers that
//! need to wait for eventual consistency do so explicitly.
//!
//! ```ignore
//! use litellm_http::HttpClient;
//! use std::time::Duration;
//!
//! let client = HttpClient::builder()
//!     .timeout(Duration::from_secs(10))
//!     .default_header("authorization", "Bearer sk-1234")
//!     .build()?;
//!
//! let resp = client
//!     .get("https://proxy.example.com/user/info?user_id=42")
//!     .send()
//!     .await?;
//! ```

mod builder;
mod client;
mod config;
mod error;
mod layers;
mod request;
mod response;

pub use builder::HttpClientBuilder;
pub use client::HttpClient;
pub use config::{DEFAULT_MAX_BODY_SIZE, DEFAULT_USER_AGENT, HttpClientConfig, TransportSecurity};
pub use error::{HttpError, InvalidUriKind};
pub use layers::{DefaultHeadersLayer, DefaultHeadersService};
pub use request::RequestBuilder;
pub use response::{ERROR_BODY_PREVIEW_LIMIT, HttpResponse, ResponseBody};
