//! Application context owning the client lifecycle
//!
//! [`AppContext`] replaces hidden module-level singletons: it is created
//! once at startup, owns the configuration loader and the credential store,
//! and memoizes client construction so repeated and concurrent calls share
//! one eventual instance.

use crate::client::{AuthenticatedClient, PublicClient};
use crate::error::ClientError;
use crate::interceptor::{BearerAuth, RequestInterceptor, ResponseInterceptor};
use crate::refresh::{ReauthHook, TokenRefresh};
use atrium_core::{
    AsyncMemo, ConfigLoader, ConfigSource, CoreError, CredentialStore, MemoryCredentialStore,
    RuntimeConfig,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Options applied to the HTTP transport and the refresh behavior
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout; `None` inherits the transport default
    pub timeout: Option<Duration>,

    /// User agent sent with every request
    pub user_agent: String,

    /// Coalesce concurrent 401-triggered refreshes behind one in-flight
    /// call. Off by default: each 401 independently refreshes, which is the
    /// platform's historical behavior.
    pub coalesce_refresh: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
            user_agent: "atrium-client/0.1.0".to_string(),
            coalesce_refresh: false,
        }
    }
}

/// Process-wide application context
pub struct AppContext {
    config: Arc<ConfigLoader>,
    store: Arc<dyn CredentialStore>,
    options: ClientOptions,
    on_reauth: Option<ReauthHook>,
    authenticated: AsyncMemo<AuthenticatedClient, CoreError>,
    public: AsyncMemo<PublicClient, CoreError>,
}

impl AppContext {
    /// Create a builder
    pub fn builder() -> AppContextBuilder {
        AppContextBuilder::default()
    }

    /// Runtime configuration, loaded on first use
    pub async fn config(&self) -> Result<RuntimeConfig, ClientError> {
        self.config.get().await.map_err(ClientError::from)
    }

    /// The credential store shared with the interceptors
    pub fn credential_store(&self) -> Arc<dyn CredentialStore> {
        Arc::clone(&self.store)
    }

    /// The authenticated client, constructed once
    ///
    /// The first call awaits the configuration load and builds the client;
    /// concurrent first calls share that construction. A construction
    /// failure is not cached, so a later call retries.
    pub async fn authenticated(&self) -> Result<AuthenticatedClient, ClientError> {
        let config = Arc::clone(&self.config);
        let store = Arc::clone(&self.store);
        let options = self.options.clone();
        let on_reauth = self.on_reauth.clone();
        self.authenticated
            .get_or_init(move || build_authenticated(config, store, options, on_reauth))
            .await
            .map_err(ClientError::from)
    }

    /// The unauthenticated client for pre-login endpoints, constructed once
    pub async fn public(&self) -> Result<PublicClient, ClientError> {
        let config = Arc::clone(&self.config);
        let options = self.options.clone();
        self.public
            .get_or_init(move || async move {
                let cfg = config.get().await?;
                let transport = build_transport(&options)?;
                Ok(PublicClient::new(transport, cfg.user_api_base_url))
            })
            .await
            .map_err(ClientError::from)
    }
}

async fn build_authenticated(
    config: Arc<ConfigLoader>,
    store: Arc<dyn CredentialStore>,
    options: ClientOptions,
    on_reauth: Option<ReauthHook>,
) -> Result<AuthenticatedClient, CoreError> {
    let cfg = config.get().await?;
    let transport = build_transport(&options)?;

    let request_interceptors: Vec<Arc<dyn RequestInterceptor>> =
        vec![Arc::new(BearerAuth::new(Arc::clone(&store)))];
    let response_interceptors: Vec<Arc<dyn ResponseInterceptor>> = vec![Arc::new(
        TokenRefresh::new(
            transport.clone(),
            &cfg.credential_api_base_url,
            store,
            on_reauth,
            options.coalesce_refresh,
        ),
    )];

    debug!(base_url = %cfg.user_api_base_url, "constructed authenticated client");
    Ok(AuthenticatedClient::new(
        transport,
        cfg.user_api_base_url,
        request_interceptors,
        response_interceptors,
    ))
}

fn build_transport(options: &ClientOptions) -> Result<reqwest::Client, CoreError> {
    let mut builder = reqwest::ClientBuilder::new().user_agent(options.user_agent.clone());
    if let Some(timeout) = options.timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| CoreError::invalid_config(format!("failed to build HTTP transport: {e}")))
}

/// Builder for [`AppContext`]
#[derive(Default)]
pub struct AppContextBuilder {
    config: Option<Arc<ConfigLoader>>,
    store: Option<Arc<dyn CredentialStore>>,
    options: Option<ClientOptions>,
    on_reauth: Option<ReauthHook>,
}

impl AppContextBuilder {
    /// Use a prepared configuration loader
    pub fn config_loader(mut self, loader: ConfigLoader) -> Self {
        self.config = Some(Arc::new(loader));
        self
    }

    /// Load configuration from the given source
    pub fn config_source(mut self, source: impl ConfigSource + 'static) -> Self {
        self.config = Some(Arc::new(ConfigLoader::new(Arc::new(source))));
        self
    }

    /// Use the given credential store instead of an in-memory one
    pub fn credential_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set transport and refresh options
    pub fn options(mut self, options: ClientOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Hook invoked when credentials are cleared after a failed refresh
    pub fn on_reauth(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_reauth = Some(Arc::new(hook));
        self
    }

    /// Build the context
    pub fn build(self) -> AppContext {
        AppContext {
            config: self
                .config
                .unwrap_or_else(|| Arc::new(ConfigLoader::from_env())),
            store: self
                .store
                .unwrap_or_else(|| Arc::new(MemoryCredentialStore::new())),
            options: self.options.unwrap_or_default(),
            on_reauth: self.on_reauth,
            authenticated: AsyncMemo::new(),
            public: AsyncMemo::new(),
        }
    }
}
