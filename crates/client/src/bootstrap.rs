//! Access resolution for console startup
//!
//! Before the console renders anything it resolves whether the current
//! session may use this service: a stored access token is required, then
//! the current user and their permission grants are fetched and checked
//! against the configured service identifier.

use crate::context::AppContext;
use crate::error::ClientError;
use crate::types::UserProfile;
use atrium_core::{ACCESS_TOKEN_KEY, CredentialStore};
use tracing::warn;
use uuid::Uuid;

/// Outcome of the startup access check
#[derive(Debug, Clone)]
pub enum AccessDecision {
    /// The user holds a grant for this service
    Granted { user: UserProfile },
    /// The user is authenticated but holds no grant for this service
    Denied { user: UserProfile },
    /// No access token is stored; the caller should send the user to the
    /// authentication surface
    Unauthenticated { auth_web_url: String },
}

impl AppContext {
    /// Resolve whether the current session may use this service
    ///
    /// A failed permission lookup degrades to [`AccessDecision::Denied`];
    /// a failed profile fetch is an error, since there is no user to gate.
    pub async fn resolve_access(&self) -> Result<AccessDecision, ClientError> {
        let config = self.config().await?;

        if self.credential_store().get(ACCESS_TOKEN_KEY).is_none() {
            return Ok(AccessDecision::Unauthenticated {
                auth_web_url: config.auth_web_url,
            });
        }

        let client = self.authenticated().await?;
        let user = client.profile().await?;

        let service = Uuid::parse_str(&config.service_id).ok();
        let granted = match client.user_permissions().await {
            Ok(grants) => service.is_some_and(|id| grants.iter().any(|grant| grant.uuid == id)),
            Err(error) => {
                warn!(%error, "failed to check permissions");
                false
            }
        };

        Ok(if granted {
            AccessDecision::Granted { user }
        } else {
            AccessDecision::Denied { user }
        })
    }
}
