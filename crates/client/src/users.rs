//! User and permission client methods

use crate::client::AuthenticatedClient;
use crate::error::ClientError;
use crate::types::{ApiEnvelope, Page, PermissionGrant, SearchBody, UserProfile};
use reqwest::Method;

impl AuthenticatedClient {
    /// Get the current user's profile
    pub async fn profile(&self) -> Result<UserProfile, ClientError> {
        let request = self.request(Method::GET, "/api/v1/users/profile");
        let envelope: ApiEnvelope<UserProfile> = self.execute(request).await?;
        Ok(envelope.data)
    }

    /// List the permission grants held by the current user
    pub async fn user_permissions(&self) -> Result<Vec<PermissionGrant>, ClientError> {
        let request = self.request(Method::GET, "/api/v1/permissions/user");
        let envelope: ApiEnvelope<Vec<PermissionGrant>> = self.execute(request).await?;
        Ok(envelope.data)
    }

    /// List users, optionally filtered by free text
    ///
    /// The platform serves filtered listings over PATCH so the filter can
    /// ride in the body.
    pub async fn list_users(
        &self,
        page: Page,
        search: Option<&str>,
    ) -> Result<Vec<UserProfile>, ClientError> {
        let mut request = self.request(Method::PATCH, "/api/v1/users").query(&page);
        if let Some(text) = search.filter(|text| !text.is_empty()) {
            request = request.json(&SearchBody { search: text });
        }
        let envelope: ApiEnvelope<Vec<UserProfile>> = self.execute(request).await?;
        Ok(envelope.data)
    }
}
