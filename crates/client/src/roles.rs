//! Role and permission-assignment client methods

use crate::client::AuthenticatedClient;
use crate::error::ClientError;
use crate::types::{ApiEnvelope, PermissionGrant, Role, UserSelection};
use reqwest::Method;
use serde_json::Value;
use uuid::Uuid;

impl AuthenticatedClient {
    /// List the system-defined roles
    pub async fn system_roles(&self) -> Result<Vec<Role>, ClientError> {
        let request = self.request(Method::GET, "/api/v1/roles/system");
        let envelope: ApiEnvelope<Vec<Role>> = self.execute(request).await?;
        Ok(envelope.data)
    }

    /// List the permissions attached to a role
    pub async fn role_permissions(&self, role: Uuid) -> Result<Vec<PermissionGrant>, ClientError> {
        let request = self.request(Method::GET, &format!("/api/v1/roles/{role}/permission"));
        let envelope: ApiEnvelope<Vec<PermissionGrant>> = self.execute(request).await?;
        Ok(envelope.data)
    }

    /// List the roles held by the current user
    pub async fn user_roles(&self) -> Result<Vec<Role>, ClientError> {
        let request = self.request(Method::GET, "/api/v1/roles/user");
        let envelope: ApiEnvelope<Vec<Role>> = self.execute(request).await?;
        Ok(envelope.data)
    }

    /// Assign a role to the given users
    pub async fn assign_role(&self, role: Uuid, users: &[Uuid]) -> Result<Value, ClientError> {
        let request = self
            .request(Method::POST, &format!("/api/v1/roles/{role}/add-user-role"))
            .json(&UserSelection { users });
        let envelope: ApiEnvelope<Value> = self.execute(request).await?;
        Ok(envelope.data)
    }
}
