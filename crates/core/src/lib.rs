//! Atrium core types and utilities
//!
//! Runtime configuration, credential storage, and the shared async
//! memoization primitive used by the client layer.

pub mod config;
pub mod credentials;
pub mod error;
pub mod memo;

pub use config::{ConfigLoader, ConfigSource, LayeredSource, RuntimeConfig};
pub use credentials::{
    ACCESS_TOKEN_KEY, CredentialStore, FileCredentialStore, MemoryCredentialStore,
    REFRESH_TOKEN_KEY, TokenPair,
};
pub use error::{CoreError, CoreResult};
pub use memo::AsyncMemo;
