//! Request and response types for the platform APIs
//!
//! Response types are deliberately lenient: fields the console does not
//! rely on are optional with defaults, so additive server changes do not
//! break deserialization.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The `{ "data": ... }` envelope wrapping every platform response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Pagination query parameters
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Page {
    pub page: u32,
    pub limit: u32,
}

impl Page {
    pub fn new(page: u32, limit: u32) -> Self {
        Self { page, limit }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

/// Token pair issued by the credential service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialPair {
    pub token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Optional free-text filter carried in the body of filtered listings
#[derive(Debug, Clone, Serialize)]
pub(crate) struct SearchBody<'a> {
    pub search: &'a str,
}

/// User selection carried by membership and role-assignment endpoints
#[derive(Debug, Clone, Serialize)]
pub(crate) struct UserSelection<'a> {
    pub users: &'a [Uuid],
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct GroupRequest<'a> {
    pub name: &'a str,
    pub description: &'a str,
}

/// A user as returned by the user API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub uuid: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// A permission grant held by a user or attached to a role
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionGrant {
    pub uuid: Uuid,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub uuid: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub uuid: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub uuid: Uuid,
    #[serde(default)]
    pub name: Option<String>,
}
