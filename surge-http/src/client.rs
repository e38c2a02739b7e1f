//! Cloud API client

use crate::errors::{HttpError, HttpResult};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use surge_config::ApiConfig;
use tracing::{debug, warn};

/// Header carrying both admin API keys and tenant access tokens
pub const API_KEY_HEADER: &str = "x-api-key";

/// Headers for calls made as a tenant wallet
pub fn tenant_headers(access_token: &str) -> HttpResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static(API_KEY_HEADER),
        header_value(access_token)?,
    );
    Ok(headers)
}

pub(crate) fn header_value(value: &str) -> HttpResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| HttpError::InvalidHeader(format!("{}: {}", API_KEY_HEADER, e)))
}

/// Raw response: status plus body text
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> HttpResult<T> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Fail with the status and body unless the response is 2xx
    pub fn ensure_success(self, action: &'static str) -> HttpResult<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(self.into_error(action))
        }
    }

    /// Fail unless the status is exactly `expected`
    pub fn ensure_status(self, action: &'static str, expected: StatusCode) -> HttpResult<Self> {
        if self.status == expected {
            Ok(self)
        } else {
            Err(self.into_error(action))
        }
    }

    pub fn into_error(self, action: &'static str) -> HttpError {
        HttpError::UnexpectedStatus {
            action,
            status: self.status,
            body: self.body,
        }
    }
}

/// Client bound to one Cloud API deployment
#[derive(Debug, Clone)]
pub struct CloudApi {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl CloudApi {
    /// Create a client from API configuration
    pub fn new(config: &ApiConfig) -> HttpResult<Self> {
        url::Url::parse(&config.base_url)
            .map_err(|e| HttpError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;

        debug!(
            "Creating Cloud API client for {} with timeout: {}s",
            config.base_url,
            config.timeout.as_secs()
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout,
        })
    }

    /// Client for `base_url` with default settings
    pub fn with_base_url(base_url: impl Into<String>) -> HttpResult<Self> {
        Self::new(&ApiConfig {
            base_url: base_url.into(),
            ..ApiConfig::default()
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a service path
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub(crate) fn request(
        &self,
        method: Method,
        path: &str,
        headers: &HeaderMap,
    ) -> RequestBuilder {
        self.client
            .request(method, self.url(path))
            .headers(headers.clone())
            .timeout(self.timeout)
    }

    /// Send a request and collect status and body
    pub async fn execute(&self, request: RequestBuilder) -> HttpResult<ApiResponse> {
        let response = request.send().await.map_err(|e| {
            warn!("Request failed before a response was received: {}", e);
            HttpError::from(e)
        })?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            debug!("Response status: {}, body: {}", status, body);
        }

        Ok(ApiResponse { status, body })
    }

    /// GET with an optional per-request timeout override
    pub async fn get(
        &self,
        path: &str,
        headers: &HeaderMap,
        timeout: Option<Duration>,
    ) -> HttpResult<ApiResponse> {
        let mut request = self.request(Method::GET, path, headers);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }
        self.execute(request).await
    }

    /// Open a long-lived GET whose body is consumed incrementally.
    ///
    /// The response is returned whatever its status; `timeout` bounds the
    /// whole connection including the body.
    pub async fn open_stream(
        &self,
        path: &str,
        headers: &HeaderMap,
        timeout: Duration,
    ) -> HttpResult<reqwest::Response> {
        let request = self
            .request(Method::GET, path, headers)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .timeout(timeout);
        Ok(request.send().await?)
    }

    /// GET with query parameters
    pub async fn get_query<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        headers: &HeaderMap,
        query: &Q,
    ) -> HttpResult<ApiResponse> {
        self.execute(self.request(Method::GET, path, headers).query(query))
            .await
    }

    /// POST a JSON body
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        headers: &HeaderMap,
        body: &B,
        timeout: Option<Duration>,
    ) -> HttpResult<ApiResponse> {
        let mut request = self
            .request(Method::POST, path, headers)
            .header(CONTENT_TYPE, "application/json")
            .json(body);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }
        self.execute(request).await
    }

    /// POST without a body
    pub async fn post_empty(&self, path: &str, headers: &HeaderMap) -> HttpResult<ApiResponse> {
        self.execute(self.request(Method::POST, path, headers))
            .await
    }

    pub async fn delete(&self, path: &str, headers: &HeaderMap) -> HttpResult<ApiResponse> {
        self.execute(self.request(Method::DELETE, path, headers))
            .await
    }

    /// POST an urlencoded form to an absolute path under the base URL
    pub async fn post_form<F: Serialize + ?Sized>(
        &self,
        path: &str,
        form: &F,
    ) -> HttpResult<ApiResponse> {
        self.execute(self.request(Method::POST, path, &HeaderMap::new()).form(form))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let api = CloudApi::with_base_url("http://localhost:8100/").unwrap();
        assert_eq!(api.base_url(), "http://localhost:8100");
        assert_eq!(
            api.url("/tenant-admin/v1/tenants"),
            "http://localhost:8100/tenant-admin/v1/tenants"
        );
        assert_eq!(
            api.url("tenant/v1/oob/create-invitation"),
            "http://localhost:8100/tenant/v1/oob/create-invitation"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            CloudApi::with_base_url("not a url"),
            Err(HttpError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_tenant_headers() {
        let headers = tenant_headers("tenant.eyJhbGciOi").unwrap();
        assert_eq!(headers[API_KEY_HEADER], "tenant.eyJhbGciOi");
        assert!(tenant_headers("bad\nvalue").is_err());
    }

    #[test]
    fn test_ensure_success() {
        let ok = ApiResponse {
            status: StatusCode::OK,
            body: "{}".into(),
        };
        assert!(ok.ensure_success("health check").is_ok());

        let failed = ApiResponse {
            status: StatusCode::BAD_GATEWAY,
            body: "upstream".into(),
        };
        let err = failed.ensure_success("health check").unwrap_err();
        assert_eq!(err.to_string(), "health check returned 502 Bad Gateway: upstream");
    }
}
