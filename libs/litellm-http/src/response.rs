use crate::error::HttpError;
use bytes::Bytes;
use http::{Response, StatusCode};
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;

/// Maximum body preview kept in `HttpError::HttpStatus` (8 KB).
pub const ERROR_BODY_PREVIEW_LIMIT: usize = 8 * 1024;

/// Boxed response body after the decompression layer.
pub type ResponseBody =
    http_body_util::combinators::BoxBody<Bytes, Box<dyn std::error::Error + Send + Sync>>;

/// HTTP response wrapper with body-reading helpers
///
/// `send()` succeeds for every HTTP status; the status is inspected with
/// [`status()`](Self::status) or turned into an error with
/// [`error_for_status()`](Self::error_for_status) / [`json()`](Self::json).
/// All body reads enforce the configured `max_body_size`.
#[derive(Debug)]
pub struct HttpResponse {
    pub(crate) inner: Response<ResponseBody>,
    pub(crate) max_body_size: usize,
}

impl HttpResponse {
    /// Get the response status code
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.inner.status()
    }

    /// Return `HttpError::HttpStatus` for non-2xx responses, reading a
    /// bounded preview of the body into the error.
    ///
    /// # Errors
    /// Returns `HttpError::HttpStatus` if the status is not 2xx, or a
    /// transport error if the error body cannot be read.
    pub async fn error_for_status(self) -> Result<Self, HttpError> {
        if self.inner.status().is_success() {
            return Ok(self);
        }
        Err(status_error(self.inner, self.max_body_size).await)
    }

    /// Read the body without a status check
    ///
    /// # Errors
    /// Returns `HttpError::BodyTooLarge` if the body exceeds the limit.
    pub async fn bytes(self) -> Result<Bytes, HttpError> {
        read_body_limited(self.inner, self.max_body_size).await
    }

    /// Read the body with a status check
    ///
    /// # Errors
    /// Returns `HttpError::HttpStatus` if status is not 2xx.
    /// Returns `HttpError::BodyTooLarge` if body exceeds limit.
    pub async fn checked_bytes(self) -> Result<Bytes, HttpError> {
        if !self.inner.status().is_success() {
            return Err(status_error(self.inner, self.max_body_size).await);
        }
        read_body_limited(self.inner, self.max_body_size).await
    }

    /// Parse the body as JSON with a status check
    ///
    /// # Errors
    /// Returns `HttpError::HttpStatus` if status is not 2xx.
    /// Returns `HttpError::BodyTooLarge` if body exceeds limit.
    /// Returns `HttpError::Json` if parsing fails.
    pub async fn json<T: DeserializeOwned>(self) -> Result<T, HttpError> {
        let body = self.checked_bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Build an `HttpStatus` error from a non-2xx response.
///
/// An oversized body does not hide the status: the preview is replaced by a
/// marker instead.
async fn status_error(response: Response<ResponseBody>, max_body_size: usize) -> HttpError {
    let status = response.status();
    let content_type = response
        .headers()
        .get(http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let preview_limit = max_body_size.min(ERROR_BODY_PREVIEW_LIMIT);
    let body_preview = match read_body_limited(response, preview_limit).await {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(HttpError::BodyTooLarge { .. }) => "<body too large for preview>".to_owned(),
        Err(e) => return e,
    };

    HttpError::HttpStatus {
        status,
        body_preview,
        content_type,
    }
}

/// Collect a body, failing once more than `limit` decompressed bytes arrive.
async fn read_body_limited(
    response: Response<ResponseBody>,
    limit: usize,
) -> Result<Bytes, HttpError> {
    let body = response.into_body();

    let mut collected = Vec::new();
    let mut body = std::pin::pin!(body);

    while let Some(frame) = body.frame().await {
        let frame = frame.map_err(HttpError::Transport)?;
        if let Some(chunk) = frame.data_ref() {
            if collected.len() + chunk.len() > limit {
                return Err(HttpError::BodyTooLarge {
                    limit,
                    actual: collected.len() + chunk.len(),
                });
            }
            collected.extend_from_slice(chunk);
        }
    }

    Ok(Bytes::from(collected))
}
