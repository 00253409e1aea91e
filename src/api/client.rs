//! API Client
//!
//! HTTP client for the Leterago backend. Every call returns the decoded
//! response envelope or a typed `ApiError`; nothing reaches the caller as
//! a raw body.

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Url};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::models::ApiResponse;
use crate::session::AuthContext;

/// Best-effort reading of an error body
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<String>,
}

/// Shared HTTP client; cheap to clone
#[derive(Clone)]
pub struct ApiClient {
    base_url: Url,
    http_client: reqwest::Client,
    auth: AuthContext,
}

impl ApiClient {
    /// Create new client bound to `auth` for the bearer token
    pub fn new(config: &ClientConfig, auth: AuthContext) -> ApiResult<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ApiError::Config(format!("invalid base URL '{}': {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Config(format!("'{}' cannot be a base URL", config.base_url)));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            base_url,
            http_client,
            auth,
        })
    }

    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Base URL plus path segments; each segment is percent-encoded
    pub fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ApiError::Config("base URL cannot take a path".to_string()))?;
            path.pop_if_empty();
            path.extend(segments);
        }
        Ok(url)
    }

    // ========================================================================
    // VERBS
    // ========================================================================

    pub async fn get<T: DeserializeOwned>(&self, path: &[&str]) -> ApiResult<ApiResponse<T>> {
        let request = self.request(Method::GET, path)?;
        self.send(request).await
    }

    /// GET with query parameters (`None` fields are left out)
    pub async fn get_with<T, Q>(&self, path: &[&str], query: &Q) -> ApiResult<ApiResponse<T>>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let request = self.request(Method::GET, path)?.query(query);
        self.send(request).await
    }

    pub async fn post<T, B>(&self, path: &[&str], body: &B) -> ApiResult<ApiResponse<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.request(Method::POST, path)?.json(body);
        self.send(request).await
    }

    /// POST without a body
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &[&str]) -> ApiResult<ApiResponse<T>> {
        let request = self.request(Method::POST, path)?;
        self.send(request).await
    }

    pub async fn put<T, B>(&self, path: &[&str], body: &B) -> ApiResult<ApiResponse<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.request(Method::PUT, path)?.json(body);
        self.send(request).await
    }

    /// DELETE; any `data` the server sends back is ignored
    pub async fn delete(&self, path: &[&str]) -> ApiResult<ApiResponse<IgnoredAny>> {
        let request = self.request(Method::DELETE, path)?;
        self.send(request).await
    }

    /// `GET /health`; any failure counts as unhealthy
    pub async fn health_check(&self) -> bool {
        self.probe(&["health"]).await
    }

    /// GET `path` and report whether it answered with a successful envelope
    pub async fn probe(&self, path: &[&str]) -> bool {
        match self.get::<IgnoredAny>(path).await {
            Ok(response) => response.success,
            Err(e) => {
                tracing::warn!("Health check of /{} failed: {}", path.join("/"), e);
                false
            }
        }
    }

    // ========================================================================
    // INTERNALS
    // ========================================================================

    fn request(&self, method: Method, path: &[&str]) -> ApiResult<RequestBuilder> {
        let url = self.endpoint(path)?;
        tracing::debug!("{} {}", method, url);

        let request = self.http_client.request(method, url);
        Ok(match self.auth.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        })
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<ApiResponse<T>> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            let envelope: ApiResponse<T> = serde_json::from_str(&body).map_err(|e| {
                tracing::warn!("Undecodable response body ({}): {}", status, e);
                ApiError::Malformed(e.to_string())
            })?;
            return envelope.ensure_success();
        }

        let ErrorBody { message, errors } = serde_json::from_str(&body).unwrap_or_default();
        let error = ApiError::from_status(status.as_u16(), message, errors);

        if matches!(error, ApiError::Unauthorized(_)) {
            tracing::warn!("Session rejected by server, clearing credentials");
            if let Err(e) = self.auth.clear_token() {
                tracing::error!("Failed to clear stored session: {}", e);
            }
        } else {
            tracing::debug!("Request failed with {}: {}", status, error);
        }

        Err(error)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("auth", &self.auth)
            .finish()
    }
}
