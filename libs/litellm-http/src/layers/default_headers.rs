use crate::error::HttpError;
use http::header::{AUTHORIZATION, HeaderName, USER_AGENT};
use http::{HeaderValue, Request, Response};
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Tower layer that adds a fixed set of headers to every request.
///
/// Carries the User-Agent and any static credentials (the proxy API key).
/// A header the request already carries is left untouched.
#[derive(Clone, Debug)]
pub struct DefaultHeadersLayer {
    headers: Arc<Vec<(HeaderName, HeaderValue)>>,
}

impl DefaultHeadersLayer {
    /// Create a layer from a user agent and extra `(name, value)` pairs.
    ///
    /// `authorization` values are flagged sensitive.
    ///
    /// # Errors
    /// Returns `HttpError::InvalidHeaderName` / `HttpError::InvalidHeaderValue`
    /// if any pair is not a valid header.
    pub fn try_new(
        user_agent: impl AsRef<str>,
        extra: &[(String, String)],
    ) -> Result<Self, HttpError> {
        let mut headers = Vec::with_capacity(extra.len() + 1);
        headers.push((USER_AGENT, HeaderValue::from_str(user_agent.as_ref())?));

        for (name, value) in extra {
            let name = HeaderName::try_from(name.as_str())?;
            let mut value = HeaderValue::try_from(value.as_str())?;
            if name == AUTHORIZATION {
                value.set_sensitive(true);
            }
            headers.push((name, value));
        }

        Ok(Self {
            headers: Arc::new(headers),
        })
    }
}

impl<S> Layer<S> for DefaultHeadersLayer {
    type Service = DefaultHeadersService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        DefaultHeadersService {
            inner,
            headers: Arc::clone(&self.headers),
        }
    }
}

/// Service that adds the configured default headers to requests
#[derive(Clone, Debug)]
pub struct DefaultHeadersService<S> {
    inner: S,
    headers: Arc<Vec<(HeaderName, HeaderValue)>>,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for DefaultHeadersService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        for (name, value) in &*self.headers {
            if !req.headers().contains_key(name) {
                req.headers_mut().insert(name.clone(), value.clone());
            }
        }
        self.inner.call(req)
    }
}
