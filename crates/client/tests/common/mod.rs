//! Shared fixtures for the integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use atrium_client::AppContext;
use atrium_core::{ConfigSource, CoreResult, MemoryCredentialStore, RuntimeConfig};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Service identifier the test configuration grants access to
pub const SERVICE_ID: &str = "6f9d2f1e-85a3-4b44-9c3b-6a07ad45f3d0";

/// Install a test subscriber so `RUST_LOG` surfaces client traces
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

pub const AUTH_WEB_URL: &str = "https://auth.example.com";

/// Configuration pointing both platform APIs at the same mock server
pub fn test_config(api_base: &str) -> RuntimeConfig {
    RuntimeConfig {
        user_api_base_url: api_base.to_string(),
        credential_api_base_url: api_base.to_string(),
        service_id: SERVICE_ID.to_string(),
        auth_web_url: AUTH_WEB_URL.to_string(),
        base_path: String::new(),
        asset_prefix: String::new(),
    }
}

/// Configuration source resolving to a fixed value
pub struct StaticSource(pub RuntimeConfig);

#[async_trait]
impl ConfigSource for StaticSource {
    async fn load(&self) -> CoreResult<RuntimeConfig> {
        Ok(self.0.clone())
    }
}

/// Configuration source counting how often it is actually fetched
pub struct CountingSource {
    config: RuntimeConfig,
    loads: Arc<AtomicUsize>,
}

impl CountingSource {
    pub fn new(config: RuntimeConfig) -> (Self, Arc<AtomicUsize>) {
        let loads = Arc::new(AtomicUsize::new(0));
        let source = Self {
            config,
            loads: Arc::clone(&loads),
        };
        (source, loads)
    }
}

#[async_trait]
impl ConfigSource for CountingSource {
    async fn load(&self) -> CoreResult<RuntimeConfig> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.config.clone())
    }
}

/// Context wired to the mock server with the given credential store
pub fn context(api_base: &str, store: Arc<MemoryCredentialStore>) -> AppContext {
    AppContext::builder()
        .config_source(StaticSource(test_config(api_base)))
        .credential_store(store)
        .build()
}
