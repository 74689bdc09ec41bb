//! Token refresh on authentication failure
//!
//! A 401 from any endpoint other than the refresh endpoint triggers exactly
//! one refresh-and-retry cycle: exchange the refresh token for a new pair,
//! store it, and replay the original request with the new access token. The
//! replayed outcome is returned to the caller whatever it is. If the refresh
//! itself fails, both tokens are removed and the re-authentication hook
//! fires.

use crate::error::ClientError;
use crate::interceptor::{ResponseInterceptor, RetryHandle, bearer_header};
use crate::types::{ApiEnvelope, CredentialPair};
use async_trait::async_trait;
use atrium_core::{CredentialStore, TokenPair};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Path fragment identifying the refresh endpoint, used for loop prevention
pub const REFRESH_TOKEN_PATH: &str = "credential/refresh";

/// Hook invoked after credentials are cleared, so the host application can
/// send the user back to the authentication surface
pub type ReauthHook = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
}

/// Refresh failure as shared between coalesced waiters; message-only so the
/// outcome stays `Clone`
#[derive(Debug, Clone)]
struct RefreshFailure(String);

type InFlightRefresh = Shared<BoxFuture<'static, Result<CredentialPair, RefreshFailure>>>;

async fn call_refresh(
    transport: reqwest::Client,
    refresh_url: String,
    pair: TokenPair,
) -> Result<CredentialPair, RefreshFailure> {
    let mut request = transport.patch(&refresh_url).json(&RefreshRequest {
        refresh_token: pair.refresh_token,
    });
    if let Some(token) = &pair.token {
        let value = bearer_header(token).map_err(|e| RefreshFailure(e.to_string()))?;
        request = request.header(AUTHORIZATION, value);
    }

    let response = request
        .send()
        .await
        .map_err(|e| RefreshFailure(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_else(|_| status.to_string());
        return Err(RefreshFailure(format!("{status}: {message}")));
    }

    let envelope: ApiEnvelope<CredentialPair> = response
        .json()
        .await
        .map_err(|e| RefreshFailure(e.to_string()))?;
    Ok(envelope.data)
}

/// Response interceptor performing the single refresh-and-retry cycle
pub struct TokenRefresh {
    transport: reqwest::Client,
    refresh_url: String,
    store: Arc<dyn CredentialStore>,
    on_reauth: Option<ReauthHook>,
    /// Present only when coalescing is enabled; holds the in-flight refresh
    /// that concurrent 401 handlers join
    in_flight: Option<Mutex<Option<InFlightRefresh>>>,
}

impl TokenRefresh {
    pub fn new(
        transport: reqwest::Client,
        credential_api_base_url: &str,
        store: Arc<dyn CredentialStore>,
        on_reauth: Option<ReauthHook>,
        coalesce: bool,
    ) -> Self {
        let refresh_url = format!(
            "{}/api/v1/{}",
            credential_api_base_url.trim_end_matches('/'),
            REFRESH_TOKEN_PATH
        );
        Self {
            transport,
            refresh_url,
            store,
            on_reauth,
            in_flight: coalesce.then(|| Mutex::new(None)),
        }
    }

    /// Exchange the stored refresh token for a new pair
    ///
    /// Tokens are read from the store at refresh time, not captured earlier;
    /// a concurrent refresh may already have replaced them.
    async fn refresh(&self) -> Result<CredentialPair, ClientError> {
        let Some(slot) = &self.in_flight else {
            return call_refresh(
                self.transport.clone(),
                self.refresh_url.clone(),
                self.store.token_pair(),
            )
            .await
            .map_err(|RefreshFailure(message)| ClientError::RefreshFailed(message));
        };

        let shared = {
            let mut guard = slot.lock().expect("Failed to acquire refresh lock");
            if let Some(existing) = guard.as_ref() {
                existing.clone()
            } else {
                let fut = call_refresh(
                    self.transport.clone(),
                    self.refresh_url.clone(),
                    self.store.token_pair(),
                )
                .boxed()
                .shared();
                *guard = Some(fut.clone());
                fut
            }
        };

        let result = shared.clone().await;

        let mut guard = slot.lock().expect("Failed to acquire refresh lock");
        if guard.as_ref().is_some_and(|current| current.ptr_eq(&shared)) {
            *guard = None;
        }
        drop(guard);

        result.map_err(|RefreshFailure(message)| ClientError::RefreshFailed(message))
    }
}

#[async_trait]
impl ResponseInterceptor for TokenRefresh {
    async fn intercept(
        &self,
        outcome: Result<reqwest::Response, ClientError>,
        retry: &RetryHandle,
    ) -> Result<reqwest::Response, ClientError> {
        let response = match outcome {
            Ok(response) => response,
            Err(error) => return Err(error),
        };

        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }
        // A 401 from the refresh endpoint itself must pass through, or a
        // rejected refresh would trigger refreshes forever.
        if retry.url().path().contains(REFRESH_TOKEN_PATH) {
            return Ok(response);
        }

        debug!(url = %retry.url(), "access token rejected, attempting refresh");
        match self.refresh().await {
            Ok(pair) => {
                self.store.store_pair(&pair.token, &pair.refresh_token);
                retry.retry_with_bearer(&pair.token).await
            }
            Err(error) => {
                warn!(%error, "token refresh failed, clearing credentials");
                self.store.clear();
                if let Some(hook) = &self.on_reauth {
                    hook();
                }
                Err(error)
            }
        }
    }
}
