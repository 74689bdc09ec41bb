//! Company client methods

use crate::client::AuthenticatedClient;
use crate::error::ClientError;
use crate::types::{ApiEnvelope, Company};
use reqwest::Method;
use serde_json::Value;
use uuid::Uuid;

impl AuthenticatedClient {
    /// Get the company of the current user
    pub async fn company(&self) -> Result<Company, ClientError> {
        let request = self.request(Method::GET, "/api/v1/company");
        let envelope: ApiEnvelope<Company> = self.execute(request).await?;
        Ok(envelope.data)
    }

    /// Get the currently selected company
    pub async fn current_company(&self) -> Result<Company, ClientError> {
        let request = self.request(Method::GET, "/api/v1/company/current");
        let envelope: ApiEnvelope<Company> = self.execute(request).await?;
        Ok(envelope.data)
    }

    /// Update a company profile
    ///
    /// The profile form is free-shaped on the server side, so the body is
    /// passed through as JSON.
    pub async fn update_company(&self, company: Uuid, profile: &Value) -> Result<Value, ClientError> {
        let request = self
            .request(Method::PUT, &format!("/api/v1/company/{company}"))
            .json(profile);
        let envelope: ApiEnvelope<Value> = self.execute(request).await?;
        Ok(envelope.data)
    }
}
