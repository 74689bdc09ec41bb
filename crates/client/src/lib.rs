//! Atrium HTTP client
//!
//! Typed client for the Atrium administration platform. An [`AppContext`]
//! created once at startup owns the runtime configuration, the credential
//! store, and the memoized client instances. The authenticated client
//! attaches the stored access token to every request and transparently
//! performs a single token-refresh-and-retry cycle on 401.

pub mod bootstrap;
pub mod client;
pub mod context;
pub mod error;
pub mod interceptor;
pub mod refresh;
pub mod types;

mod auth;
mod company;
mod groups;
mod roles;
mod users;

pub use bootstrap::AccessDecision;
pub use client::{AuthenticatedClient, PublicClient};
pub use context::{AppContext, AppContextBuilder, ClientOptions};
pub use error::ClientError;
pub use interceptor::{BearerAuth, RequestInterceptor, ResponseInterceptor, RetryHandle};
pub use refresh::{REFRESH_TOKEN_PATH, ReauthHook, TokenRefresh};
