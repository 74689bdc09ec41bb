//! Login and logout

use crate::client::PublicClient;
use crate::context::AppContext;
use crate::error::ClientError;
use crate::types::{ApiEnvelope, CredentialPair, LoginRequest};
use atrium_core::CredentialStore;
use reqwest::Method;

impl PublicClient {
    /// Authenticate with the platform and return the issued token pair
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<CredentialPair, ClientError> {
        let request = self
            .request(Method::POST, "/api/v1/users/login")
            .json(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            });
        let envelope: ApiEnvelope<CredentialPair> = self.execute(request).await?;
        Ok(envelope.data)
    }
}

impl AppContext {
    /// Log in and persist the issued tokens in the credential store
    pub async fn login(&self, email: &str, password: &str) -> Result<CredentialPair, ClientError> {
        let client = self.public().await?;
        let pair = client.login(email, password).await?;
        self.credential_store()
            .store_pair(&pair.token, &pair.refresh_token);
        Ok(pair)
    }

    /// Drop the stored credentials
    pub fn logout(&self) {
        self.credential_store().clear();
    }
}
