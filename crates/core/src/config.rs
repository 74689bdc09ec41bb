//! Runtime configuration for the Atrium platform services
//!
//! Configuration is loaded once per process through [`ConfigLoader`], which
//! memoizes the in-flight load so concurrent callers share a single fetch.

use crate::error::{CoreError, CoreResult};
use crate::memo::AsyncMemo;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use url::Url;

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "ATRIUM";

/// Runtime configuration, immutable after the first successful load
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Base URL of the user API serving business operations
    pub user_api_base_url: String,

    /// Base URL of the credential API serving the token refresh endpoint
    pub credential_api_base_url: String,

    /// Identifier of this service in the platform's permission model
    pub service_id: String,

    /// URL of the external authentication web surface
    #[serde(default)]
    pub auth_web_url: String,

    /// Path prefix the console is hosted under
    #[serde(default)]
    pub base_path: String,

    /// Prefix for static asset URLs
    #[serde(default)]
    pub asset_prefix: String,
}

impl RuntimeConfig {
    /// Validate that the loaded values are usable
    ///
    /// # Errors
    ///
    /// Returns an error if either API base URL does not parse or the
    /// service identifier is empty.
    pub fn validate(&self) -> CoreResult<()> {
        Url::parse(&self.user_api_base_url).map_err(|e| {
            CoreError::invalid_config(format!("user_api_base_url is not a valid URL: {e}"))
        })?;
        Url::parse(&self.credential_api_base_url).map_err(|e| {
            CoreError::invalid_config(format!("credential_api_base_url is not a valid URL: {e}"))
        })?;
        if self.service_id.trim().is_empty() {
            return Err(CoreError::invalid_config("service_id must not be empty"));
        }
        Ok(())
    }
}

/// An opaque asynchronous source of runtime configuration
#[async_trait]
pub trait ConfigSource: Send + Sync {
    /// Fetch the configuration from the hosting environment
    async fn load(&self) -> CoreResult<RuntimeConfig>;
}

/// Configuration source layering an optional file under `ATRIUM_*`
/// environment variables
#[derive(Debug, Clone, Default)]
pub struct LayeredSource {
    file: Option<PathBuf>,
}

impl LayeredSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a configuration file before applying environment overrides
    pub fn with_file<P: AsRef<Path>>(path: P) -> Self {
        Self {
            file: Some(path.as_ref().to_path_buf()),
        }
    }
}

#[async_trait]
impl ConfigSource for LayeredSource {
    async fn load(&self) -> CoreResult<RuntimeConfig> {
        let mut builder = config::Config::builder();
        if let Some(path) = &self.file {
            builder = builder.add_source(config::File::from(path.as_path()));
        }
        let settings = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?;

        let loaded: RuntimeConfig = settings.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }
}

/// Process-wide memoized configuration loader
///
/// The first call triggers the underlying source; callers arriving while
/// that load is in flight join it rather than starting another. A failure
/// is surfaced to every joined caller and is not cached, so the next call
/// retries.
pub struct ConfigLoader {
    source: Arc<dyn ConfigSource>,
    cached: AsyncMemo<RuntimeConfig, CoreError>,
}

impl ConfigLoader {
    pub fn new(source: Arc<dyn ConfigSource>) -> Self {
        Self {
            source,
            cached: AsyncMemo::new(),
        }
    }

    /// Loader reading from the process environment only
    pub fn from_env() -> Self {
        Self::new(Arc::new(LayeredSource::new()))
    }

    /// Loader layering a configuration file under environment overrides
    pub fn from_file<P: AsRef<Path>>(path: P) -> Self {
        Self::new(Arc::new(LayeredSource::with_file(path)))
    }

    /// Get the runtime configuration, loading it on first use
    pub async fn get(&self) -> CoreResult<RuntimeConfig> {
        let source = Arc::clone(&self.source);
        self.cached
            .get_or_init(move || async move {
                let loaded = source.load().await?;
                tracing::debug!(
                    user_api = %loaded.user_api_base_url,
                    credential_api = %loaded.credential_api_base_url,
                    "runtime configuration loaded"
                );
                Ok(loaded)
            })
            .await
    }
}
