//! Thin REST client for the proxy's `/user/*` endpoints.

use litellm_http::{HttpClient, HttpClientBuilder, HttpResponse, RequestBuilder};
use litellm_user_sdk::{UserId, UserResourceError};
use serde_json::{Map, Value};
use url::Url;

use super::http_error::map_http_error;
use crate::config::{ConfigError, ProviderConfig};
use crate::domain::fields::USER_ID;

pub const CREATE_PATH: &str = "/user/new";
pub const INFO_PATH: &str = "/user/info";
pub const UPDATE_PATH: &str = "/user/update";
pub const DELETE_PATH: &str = "/user/delete";

const NOT_FOUND: u16 = 404;

#[derive(Debug, Clone)]
pub struct LiteLlmClient {
    http: HttpClient,
    base_url: Url,
}

impl LiteLlmClient {
    #[must_use]
    pub fn new(http: HttpClient, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// Validate `config` and build a client for it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for invalid settings or if the HTTP client
    /// cannot be constructed.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let http = HttpClientBuilder::with_config(config.http_client_config()).build()?;
        Ok(Self::new(http, config.base_url.clone()))
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `path` appended to the base URL, keeping any base path prefix.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        let joined = format!("{}{path}", url.path().trim_end_matches('/'));
        url.set_path(&joined);
        url.set_query(None);
        url
    }

    /// POST a JSON body, discarding the response body.
    ///
    /// When `missing` is given, a 404 answer is reported as `NotFound` for
    /// that user instead of an API error.
    ///
    /// # Errors
    ///
    /// `Transport`, `Api` or `NotFound` as described above.
    pub async fn post_json(
        &self,
        path: &str,
        body: &Map<String, Value>,
        operation: &'static str,
        missing: Option<&UserId>,
    ) -> Result<(), UserResourceError> {
        let request = self
            .http
            .post(self.endpoint(path).as_str())
            .json(body)
            .map_err(|e| map_http_error(e, operation))?;
        let resp = Self::send(request, operation, missing).await?;
        resp.bytes().await.map_err(|e| map_http_error(e, operation))?;
        Ok(())
    }

    /// GET `/user/info?user_id=<id>` and return the raw JSON body.
    ///
    /// # Errors
    ///
    /// `NotFound` on 404, `Transport`, `Api` or `Decode` otherwise.
    pub async fn user_info(
        &self,
        id: &UserId,
        operation: &'static str,
    ) -> Result<Value, UserResourceError> {
        let mut url = self.endpoint(INFO_PATH);
        url.query_pairs_mut().append_pair(USER_ID, id.as_str());

        let resp = Self::send(self.http.get(url.as_str()), operation, Some(id)).await?;
        resp.json::<Value>()
            .await
            .map_err(|e| map_http_error(e, operation))
    }

    async fn send(
        request: RequestBuilder,
        operation: &'static str,
        missing: Option<&UserId>,
    ) -> Result<HttpResponse, UserResourceError> {
        let resp = request
            .send()
            .await
            .map_err(|e| map_http_error(e, operation))?;

        if let Some(id) = missing
            && resp.status().as_u16() == NOT_FOUND
        {
            return Err(UserResourceError::NotFound {
                user_id: id.to_string(),
            });
        }

        resp.error_for_status()
            .await
            .map_err(|e| map_http_error(e, operation))
    }
}
