use std::time::Duration;

/// Default User-Agent string for HTTP requests
pub const DEFAULT_USER_AGENT: &str = concat!("litellm-http/", env!("CARGO_PKG_VERSION"));

/// Default cap on buffered response bodies (10 MB)
pub const DEFAULT_MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// Transport security mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransportSecurity {
    /// Require TLS for all connections (HTTPS only)
    #[default]
    TlsOnly,
    /// Allow plain HTTP, e.g. a proxy on localhost or a mock server in tests
    AllowInsecureHttp,
}

/// HTTP client configuration
///
/// There is no retry policy: every request is sent exactly
/// once and failures are reported to the caller as-is.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Per-request timeout (default: 30 seconds)
    pub request_timeout: Duration,

    /// Maximum response body size in bytes (default: 10 MB)
    pub max_body_size: usize,

    /// User-Agent header value
    pub user_agent: String,

    /// Headers attached to every request unless the request already sets them.
    ///
    /// Header values listed here are marked sensitive when the name is
    /// `authorization`, so they are never printed by `Debug` on `HeaderValue`.
    pub default_headers: Vec<(String, String)>,

    /// Transport security mode (default: `TlsOnly`)
    pub transport: TransportSecurity,

    /// Buffer capacity for concurrent request handling (default: 64)
    pub buffer_capacity: usize,

    /// Timeout for idle pooled connections (default: 90 seconds)
    pub pool_idle_timeout: Option<Duration>,

    /// Maximum number of idle connections per host (default: 8)
    pub pool_max_idle_per_host: usize,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            default_headers: Vec::new(),
            transport: TransportSecurity::TlsOnly,
            buffer_capacity: 64,
            pool_idle_timeout: Some(Duration::from_secs(90)),
            pool_max_idle_per_host: 8,
        }
    }
}

impl HttpClientConfig {
    /// Configuration for tests against a local mock server
    ///
    /// Plain HTTP allowed, short timeout.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            request_timeout: Duration::from_secs(5),
            transport: TransportSecurity::AllowInsecureHttp,
            ..Self::default()
        }
    }
}
