//! Group management client methods

use crate::client::AuthenticatedClient;
use crate::error::ClientError;
use crate::types::{ApiEnvelope, Group, GroupRequest, Page, SearchBody, UserProfile, UserSelection};
use reqwest::Method;
use serde_json::Value;
use uuid::Uuid;

impl AuthenticatedClient {
    /// Create a group
    pub async fn create_group(&self, name: &str, description: &str) -> Result<Group, ClientError> {
        let request = self
            .request(Method::POST, "/api/v1/groups")
            .json(&GroupRequest { name, description });
        let envelope: ApiEnvelope<Group> = self.execute(request).await?;
        Ok(envelope.data)
    }

    /// List groups
    pub async fn list_groups(&self, page: Page) -> Result<Vec<Group>, ClientError> {
        let request = self.request(Method::GET, "/api/v1/groups").query(&page);
        let envelope: ApiEnvelope<Vec<Group>> = self.execute(request).await?;
        Ok(envelope.data)
    }

    /// List the members of a group
    pub async fn group_members(
        &self,
        group: Uuid,
        page: Page,
    ) -> Result<Vec<UserProfile>, ClientError> {
        let request = self
            .request(Method::GET, &format!("/api/v1/groups/member/{group}"))
            .query(&page);
        let envelope: ApiEnvelope<Vec<UserProfile>> = self.execute(request).await?;
        Ok(envelope.data)
    }

    /// List users not yet in a group, optionally filtered by free text
    pub async fn users_not_in_group(
        &self,
        group: Uuid,
        search: Option<&str>,
        page: Page,
    ) -> Result<Vec<UserProfile>, ClientError> {
        let mut request = self
            .request(Method::PATCH, &format!("/api/v1/groups/not-member/{group}"))
            .query(&page);
        if let Some(text) = search.filter(|text| !text.is_empty()) {
            request = request.json(&SearchBody { search: text });
        }
        let envelope: ApiEnvelope<Vec<UserProfile>> = self.execute(request).await?;
        Ok(envelope.data)
    }

    /// Add users to a group
    pub async fn add_group_members(
        &self,
        group: Uuid,
        users: &[Uuid],
    ) -> Result<Value, ClientError> {
        let request = self
            .request(Method::POST, &format!("/api/v1/groups/{group}/add-user"))
            .json(&UserSelection { users });
        let envelope: ApiEnvelope<Value> = self.execute(request).await?;
        Ok(envelope.data)
    }

    /// Delete a group
    pub async fn delete_group(&self, group: Uuid) -> Result<Value, ClientError> {
        let request = self.request(Method::DELETE, &format!("/api/v1/groups/{group}"));
        let envelope: ApiEnvelope<Value> = self.execute(request).await?;
        Ok(envelope.data)
    }
}
