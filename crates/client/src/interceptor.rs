//! Request and response interception
//!
//! The client composes ordered lists of interceptors at construction time.
//! Request interceptors transform the outgoing request; response
//! interceptors see the transport outcome and may replace it, using a
//! [`RetryHandle`] to re-issue the original request once through the bare
//! transport.

use crate::error::ClientError;
use async_trait::async_trait;
use atrium_core::{ACCESS_TOKEN_KEY, CredentialStore};
use reqwest::header::{AUTHORIZATION, HeaderValue};
use std::sync::Arc;
use url::Url;

/// Transforms an outgoing request before it is sent
///
/// An error returned here fails the request; it surfaces to the caller as
/// the request's error rather than being dropped.
#[async_trait]
pub trait RequestInterceptor: Send + Sync {
    async fn intercept(&self, request: &mut reqwest::Request) -> Result<(), ClientError>;
}

/// Transforms a transport outcome before it reaches the caller
#[async_trait]
pub trait ResponseInterceptor: Send + Sync {
    async fn intercept(
        &self,
        outcome: Result<reqwest::Response, ClientError>,
        retry: &RetryHandle,
    ) -> Result<reqwest::Response, ClientError>;
}

/// Handle for replaying the original request through the bare transport
///
/// The replay bypasses the interceptor pipeline, so a retried request can
/// never trigger another refresh cycle.
pub struct RetryHandle {
    transport: reqwest::Client,
    url: Url,
    replay: Option<reqwest::Request>,
}

impl RetryHandle {
    pub(crate) fn new(transport: reqwest::Client, request: &reqwest::Request) -> Self {
        Self {
            transport,
            url: request.url().clone(),
            replay: request.try_clone(),
        }
    }

    /// URL of the original request
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Re-issue the original request with a replacement bearer token
    pub async fn retry_with_bearer(&self, token: &str) -> Result<reqwest::Response, ClientError> {
        let mut request = self
            .replay
            .as_ref()
            .and_then(reqwest::Request::try_clone)
            .ok_or_else(|| {
                ClientError::Configuration("request body cannot be replayed for retry".into())
            })?;
        request.headers_mut().insert(AUTHORIZATION, bearer_header(token)?);
        self.transport
            .execute(request)
            .await
            .map_err(ClientError::from)
    }
}

pub(crate) fn bearer_header(token: &str) -> Result<HeaderValue, ClientError> {
    HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|e| ClientError::Configuration(format!("invalid bearer token: {e}")))
}

/// Attaches the stored access token to every outgoing request
///
/// The token is read fresh from the store per request; a request with no
/// stored token goes out unauthenticated and the server decides.
pub struct BearerAuth {
    store: Arc<dyn CredentialStore>,
}

impl BearerAuth {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RequestInterceptor for BearerAuth {
    async fn intercept(&self, request: &mut reqwest::Request) -> Result<(), ClientError> {
        if let Some(token) = self.store.get(ACCESS_TOKEN_KEY) {
            request
                .headers_mut()
                .insert(AUTHORIZATION, bearer_header(&token)?);
        }
        Ok(())
    }
}
