//! HTTP client with bearer auth injection and refresh-and-retry recovery.
//!
//! Every request attaches the session's access token. A 401/403 response
//! triggers one token refresh and one retry of the identical request; the
//! retry's outcome is final either way. Any other non-2xx response fails
//! immediately with the response body text as the error message.

use std::sync::Arc;

use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::Form;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::refresh;
use crate::config::Config;
use crate::session::Session;

/// HTTP client wrapper for the storefront backend API.
///
/// Cheap to share behind an `Arc`; all methods take `&self`.
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Arc<Session>,
}

impl ApiClient {
    /// Create a client from configuration and a shared session.
    pub fn new(config: &Config, session: Arc<Session>) -> Self {
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            http,
            base_url: config.base_url.clone(),
            session,
        }
    }

    /// The session this client reads tokens from.
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET a JSON resource from a relative API path.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        let resp = self.send(&|| self.http.get(&url)).await?;
        Self::decode(resp).await
    }

    /// POST a JSON body, expecting a JSON response.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let resp = self.send(&|| self.http.post(&url).json(body)).await?;
        Self::decode(resp).await
    }

    /// POST a JSON body to an endpoint that returns no meaningful body.
    pub async fn post_empty<B: Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        let url = self.url(path);
        let _ = self.send(&|| self.http.post(&url).json(body)).await?;
        Ok(())
    }

    /// PUT a JSON body, expecting a JSON response.
    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let resp = self.send(&|| self.http.put(&url).json(body)).await?;
        Self::decode(resp).await
    }

    /// DELETE a resource; the response body, if any, is ignored.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let url = self.url(path);
        let _ = self.send(&|| self.http.delete(&url)).await?;
        Ok(())
    }

    /// POST a multipart form (file and CSV uploads).
    ///
    /// `make_form` is invoked once per attempt: a `Form` is consumed by send
    /// and the retry after a refresh needs a fresh one. No `Content-Type`
    /// header is set here -- reqwest generates the multipart boundary.
    pub async fn post_multipart<T, F>(&self, path: &str, make_form: F) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        F: Fn() -> Form,
    {
        let url = self.url(path);
        let resp = self
            .send(&|| self.http.post(&url).multipart(make_form()))
            .await?;
        Self::decode(resp).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Issue one request with the current access token attached.
    ///
    /// On 401/403 the refresh coordinator runs once; if it restores the
    /// session, the identical request is re-issued exactly once and that
    /// response is returned as-is. If refresh is unavailable or fails, the
    /// original 401/403 is surfaced.
    async fn send(&self, build: &dyn Fn() -> RequestBuilder) -> Result<Response, ApiError> {
        let token = self.session.access_token().await;
        let resp = Self::with_bearer(build(), token.as_deref()).send().await?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let refreshed = refresh::refresh_session(
                &self.http,
                &self.base_url,
                &self.session,
                token.as_deref(),
            )
            .await;

            if refreshed {
                let fresh = self.session.access_token().await;
                let retry = Self::with_bearer(build(), fresh.as_deref()).send().await?;
                return Self::check(retry).await;
            }
        }

        Self::check(resp).await
    }

    fn with_bearer(builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token {
            Some(t) => builder.bearer_auth(t),
            None => builder,
        }
    }

    /// Map non-2xx responses to `ApiError::Status`.
    async fn check(resp: Response) -> Result<Response, ApiError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            Err(ApiError::from_response(resp).await)
        }
    }

    /// Parse a successful response as JSON when the `Content-Type` says so.
    async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
        let is_json = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.contains("application/json"))
            .unwrap_or(false);

        if !is_json {
            return Err(ApiError::Decode(
                "expected a JSON response body".to_string(),
            ));
        }

        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }
}
