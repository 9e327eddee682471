use crate::config::{HttpClientConfig, TransportSecurity};
use crate::error::HttpError;
use crate::layers::DefaultHeadersLayer;
use crate::response::ResponseBody;
use bytes::Bytes;
use http::Response;
use http_body_util::{BodyExt, Full};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::{TokioExecutor, TokioTimer};
use std::sync::Arc;
use std::time::Duration;
use tower::buffer::Buffer;
use tower::timeout::TimeoutLayer;
use tower::{ServiceBuilder, ServiceExt};
use tower_http::decompression::DecompressionLayer;

/// Builder for an [`HttpClient`](crate::HttpClient)
pub struct HttpClientBuilder {
    config: HttpClientConfig,
}

impl HttpClientBuilder {
    /// Create a new builder with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: HttpClientConfig::default(),
        }
    }

    /// Create a builder with a specific configuration
    #[must_use]
    pub fn with_config(config: HttpClientConfig) -> Self {
        Self { config }
    }

    /// Set the per-request timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Set the user agent string
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Add a header sent with every request
    #[must_use]
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config
            .default_headers
            .push((name.into(), value.into()));
        self
    }

    /// Set the maximum response body size
    #[must_use]
    pub fn max_body_size(mut self, size: usize) -> Self {
        self.config.max_body_size = size;
        self
    }

    /// Set transport security mode
    #[must_use]
    pub fn transport(mut self, transport: TransportSecurity) -> Self {
        self.config.transport = transport;
        self
    }

    /// Allow plain HTTP connections
    ///
    /// Only available in debug builds or with the `allow-insecure-http`
    /// feature; production code selects the mode through
    /// [`transport()`](Self::transport) from explicit configuration.
    #[must_use]
    #[cfg(any(debug_assertions, feature = "allow-insecure-http"))]
    pub fn allow_insecure_http(mut self) -> Self {
        self.config.transport = TransportSecurity::AllowInsecureHttp;
        self
    }

    /// Set the buffer capacity (clamped to at least 1)
    #[must_use]
    pub fn buffer_capacity(mut self, capacity: usize) -> Self {
        self.config.buffer_capacity = capacity.max(1);
        self
    }

    /// Build the HTTP client
    ///
    /// # Errors
    /// Returns an error if TLS initialization fails or a default header is
    /// invalid.
    pub fn build(self) -> Result<crate::HttpClient, HttpError> {
        if self.config.transport == TransportSecurity::AllowInsecureHttp {
            tracing::warn!(
                "insecure HTTP enabled (TransportSecurity::AllowInsecureHttp); \
                 requests and credentials may travel unencrypted"
            );
        }

        let timeout = self.config.request_timeout;
        let https = build_https_connector(self.config.transport)?;

        let mut client_builder = Client::builder(TokioExecutor::new());
        // pool_timer is required for pool_idle_timeout to take effect
        client_builder
            .pool_timer(TokioTimer::new())
            .pool_max_idle_per_host(self.config.pool_max_idle_per_host)
            .http2_only(false);
        if let Some(idle_timeout) = self.config.pool_idle_timeout {
            client_builder.pool_idle_timeout(idle_timeout);
        }
        let hyper_client = client_builder.build::<_, Full<Bytes>>(https);

        let headers_layer =
            DefaultHeadersLayer::try_new(&self.config.user_agent, &self.config.default_headers)?;

        // Request flow (outer → inner):
        //   Buffer → ErrorMapping → Timeout → DefaultHeaders → Decompression → hyper
        //
        // send() returns Ok for every HTTP status; only transport, timeout and
        // TLS failures are errors at this level.
        let service = ServiceBuilder::new()
            .layer(TimeoutLayer::new(timeout))
            .layer(headers_layer)
            .layer(DecompressionLayer::new())
            .service(hyper_client)
            .map_response(map_decompression_response)
            .map_err(move |e: tower::BoxError| map_tower_error(e, timeout));

        // Buffer spawns a worker task; clones of the client share it without locking.
        let buffered_service: crate::client::BufferedService =
            Buffer::new(service.boxed_clone(), self.config.buffer_capacity.max(1));

        Ok(crate::HttpClient {
            service: buffered_service,
            max_body_size: self.config.max_body_size,
            transport_security: self.config.transport,
        })
    }
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Map tower errors to `HttpError` with the configured timeout
fn map_tower_error(err: tower::BoxError, timeout: Duration) -> HttpError {
    if err.is::<tower::timeout::error::Elapsed>() {
        return HttpError::Timeout(timeout);
    }

    match err.downcast::<HttpError>() {
        Ok(http_err) => *http_err,
        Err(other) => HttpError::Transport(other),
    }
}

/// Box the decompression body into [`ResponseBody`]
fn map_decompression_response<B>(response: Response<B>) -> Response<ResponseBody>
where
    B: hyper::body::Body<Data = Bytes> + Send + Sync + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let (parts, body) = response.into_parts();
    let boxed_body: ResponseBody = body.map_err(Into::into).boxed();
    Response::from_parts(parts, boxed_body)
}

/// Rustls crypto provider: the process default if one is installed,
/// otherwise aws-lc-rs (without installing it globally).
fn crypto_provider() -> Arc<rustls::crypto::CryptoProvider> {
    rustls::crypto::CryptoProvider::get_default()
        .cloned()
        .unwrap_or_else(|| Arc::new(rustls::crypto::aws_lc_rs::default_provider()))
}

/// HTTPS connector with Mozilla (webpki) roots and ALPN for h2 + http/1.1.
fn build_https_connector(
    transport: TransportSecurity,
) -> Result<HttpsConnector<HttpConnector>, HttpError> {
    let builder = hyper_rustls::HttpsConnectorBuilder::new()
        .with_provider_and_webpki_roots(crypto_provider())
        .map_err(|e| HttpError::Tls(Box::new(e)))?;

    let connector = match transport {
        TransportSecurity::AllowInsecureHttp => {
            builder.https_or_http().enable_all_versions().build()
        }
        TransportSecurity::TlsOnly => builder.https_only().enable_all_versions().build(),
    };
    Ok(connector)
}
