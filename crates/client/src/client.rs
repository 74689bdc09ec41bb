//! HTTP clients for the platform APIs

use crate::error::ClientError;
use crate::interceptor::{RequestInterceptor, ResponseInterceptor, RetryHandle};
use reqwest::Method;
use std::sync::Arc;

/// Client for the protected user API
///
/// Holds the shared transport, the base URL, and the interceptor pipeline
/// composed at construction time. Cloning is cheap; every clone shares the
/// same underlying instance.
#[derive(Clone)]
pub struct AuthenticatedClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    transport: reqwest::Client,
    base_url: String,
    request_interceptors: Vec<Arc<dyn RequestInterceptor>>,
    response_interceptors: Vec<Arc<dyn ResponseInterceptor>>,
}

impl AuthenticatedClient {
    pub(crate) fn new(
        transport: reqwest::Client,
        base_url: impl Into<String>,
        request_interceptors: Vec<Arc<dyn RequestInterceptor>>,
        response_interceptors: Vec<Arc<dyn ResponseInterceptor>>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            inner: Arc::new(ClientInner {
                transport,
                base_url,
                request_interceptors,
                response_interceptors,
            }),
        }
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Whether two handles share the same underlying client instance
    pub fn same_instance(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Create a request builder for a path under the base URL
    pub fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.inner.base_url, path);
        self.inner.transport.request(method, url)
    }

    /// Send a request through the interceptor pipeline
    ///
    /// Request interceptors run in order before the network; response
    /// interceptors see the transport outcome in order afterwards. A
    /// response interceptor may replay the original request once through
    /// the bare transport.
    pub async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ClientError> {
        let mut request = request.build()?;
        for interceptor in &self.inner.request_interceptors {
            interceptor.intercept(&mut request).await?;
        }

        let retry = RetryHandle::new(self.inner.transport.clone(), &request);
        let mut outcome = self
            .inner
            .transport
            .execute(request)
            .await
            .map_err(ClientError::from);
        for interceptor in &self.inner.response_interceptors {
            outcome = interceptor.intercept(outcome, &retry).await;
        }
        outcome
    }

    /// Execute a request and deserialize a successful JSON body
    pub async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = self.send(request).await?;
        let status = response.status();

        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let message = response.text().await.unwrap_or_else(|_| status.to_string());
            Err(ClientError::from_status(status, message))
        }
    }
}

/// Client for endpoints that require no authentication, such as login
#[derive(Clone)]
pub struct PublicClient {
    transport: reqwest::Client,
    base_url: String,
}

impl PublicClient {
    pub(crate) fn new(transport: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create a request builder for a path under the base URL
    pub fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.transport.request(method, url)
    }

    /// Execute a request and deserialize a successful JSON body
    pub async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let message = response.text().await.unwrap_or_else(|_| status.to_string());
            Err(ClientError::from_status(status, message))
        }
    }
}
