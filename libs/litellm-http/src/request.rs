use crate::client::{BufferedService, map_buffer_error, try_acquire_buffer_slot};
use crate::config::TransportSecurity;
use crate::error::{HttpError, InvalidUriKind};
use crate::response::{HttpResponse, ResponseBody};
use bytes::Bytes;
use http::{Request, Response};
use http_body_util::Full;
use serde::Serialize;
use tower::Service;

/// HTTP request builder with fluent API
///
/// Created by [`HttpClient::get`](crate::HttpClient::get) and
/// [`HttpClient::post`](crate::HttpClient::post). Query strings are encoded
/// by the caller into the URL.
///
/// ```ignore
/// let resp = client
///     .post("https://proxy.example.com/user/delete")
///     .json(&serde_json::json!({ "user_ids": ["u-1"] }))?
///     .send()
///     .await?;
/// ```
#[must_use = "RequestBuilder does nothing until .send() is called"]
pub struct RequestBuilder {
    service: BufferedService,
    max_body_size: usize,
    method: http::Method,
    url: String,
    /// Serialized JSON body, if any
    json: Option<Bytes>,
    transport_security: TransportSecurity,
}

impl RequestBuilder {
    pub(crate) fn new(
        service: BufferedService,
        max_body_size: usize,
        method: http::Method,
        url: String,
        transport_security: TransportSecurity,
    ) -> Self {
        Self {
            service,
            max_body_size,
            method,
            url,
            json: None,
            transport_security,
        }
    }

    /// Set the request body as JSON (`Content-Type: application/json`)
    ///
    /// # Errors
    /// Returns `HttpError::Json` if serialization fails.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, HttpError> {
        self.json = Some(Bytes::from(serde_json::to_vec(body)?));
        Ok(self)
    }

    /// Parse the URL and check its scheme against the transport security mode.
    fn validate_url(&self) -> Result<http::Uri, HttpError> {
        let uri: http::Uri =
            self.url
                .parse()
                .map_err(|e: http::uri::InvalidUri| HttpError::InvalidUri {
                    url: self.url.clone(),
                    kind: InvalidUriKind::ParseError,
                    reason: e.to_string(),
                })?;

        if uri.authority().is_none() {
            return Err(HttpError::InvalidUri {
                url: self.url.clone(),
                kind: InvalidUriKind::MissingAuthority,
                reason: "missing host/authority".to_owned(),
            });
        }

        match uri.scheme_str() {
            Some("https") => Ok(uri),
            Some("http") => match self.transport_security {
                TransportSecurity::AllowInsecureHttp => Ok(uri),
                TransportSecurity::TlsOnly => Err(HttpError::InvalidScheme {
                    scheme: "http".to_owned(),
                    reason: "HTTPS required (transport security is TlsOnly)".to_owned(),
                }),
            },
            Some(scheme) => Err(HttpError::InvalidScheme {
                scheme: scheme.to_owned(),
                reason: "only http:// and https:// schemes are supported".to_owned(),
            }),
            None => Err(HttpError::InvalidUri {
                url: self.url.clone(),
                kind: InvalidUriKind::MissingScheme,
                reason: "missing scheme".to_owned(),
            }),
        }
    }

    /// Send the request once and return the response, whatever its status
    ///
    /// # Errors
    /// Returns `HttpError` for invalid URLs, transport failures, timeouts,
    /// and a full request buffer (`Overloaded`).
    pub async fn send(mut self) -> Result<HttpResponse, HttpError> {
        let uri = self.validate_url()?;
        let mut builder = Request::builder().method(self.method).uri(uri);
        if self.json.is_some() {
            builder = builder.header(http::header::CONTENT_TYPE, "application/json");
        }

        let request = builder.body(Full::new(self.json.unwrap_or_default()))?;

        try_acquire_buffer_slot(&mut self.service).await?;

        let inner: Response<ResponseBody> =
            self.service.call(request).await.map_err(map_buffer_error)?;

        Ok(HttpResponse {
            inner,
            max_body_size: self.max_body_size,
        })
    }
}
