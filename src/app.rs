//! Client wiring: store, API client and credential cache.

use std::sync::Arc;

use crate::api::{ApiClient, ApiError, ArticlesPage};
use crate::config::{CacheError, Config, Credentials, CredentialCache, SecureString};
use crate::store::{receive_articles, FetchError, Store, StoreState};
use crate::validation::{HttpImageProbe, ImageProbe};

pub struct App {
    config: Config,
    store: Store,
    api: ApiClient,
    cache: CredentialCache,
}

impl App {
    /// Build the client and seed the store from the credential cache.
    ///
    /// An unreadable or corrupt cache is discarded; the viewer simply starts
    /// signed out.
    pub fn new(config: Config) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config.api)?;
        let cache = CredentialCache::new(config.credentials_path());
        let credentials = load_cached(&cache);
        let store = Store::new(StoreState::with_credentials(credentials));
        Ok(Self::from_parts(config, store, api, cache))
    }

    pub fn from_parts(config: Config, store: Store, api: ApiClient, cache: CredentialCache) -> Self {
        Self {
            config,
            store,
            api,
            cache,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn cache(&self) -> &CredentialCache {
        &self.cache
    }

    /// Probe used by forms that validate image URLs.
    pub fn image_probe(&self) -> Arc<dyn ImageProbe> {
        Arc::new(HttpImageProbe::default())
    }

    /// See [`receive_articles`].
    pub async fn receive_articles(&self, page: u32) -> Result<ArticlesPage, FetchError> {
        receive_articles(&self.store, &self.api, page).await
    }

    pub(crate) fn token(&self) -> Option<SecureString> {
        self.store.with_state(|s| {
            if s.is_authenticated() {
                s.credentials.token.clone()
            } else {
                None
            }
        })
    }

    pub(crate) fn persist(&self, credentials: &Credentials) {
        if let Err(e) = self.cache.save(credentials) {
            tracing::warn!(error = %e, "Failed to persist credentials");
        }
    }

    pub(crate) fn forget(&self) {
        if let Err(e) = self.cache.clear() {
            tracing::warn!(error = %e, "Failed to remove cached credentials");
        }
    }
}

fn load_cached(cache: &CredentialCache) -> Credentials {
    match cache.load() {
        Ok(credentials) => credentials,
        Err(e @ CacheError::Corrupt { .. }) => {
            tracing::warn!(error = %e, "Discarding corrupt credential cache");
            if let Err(e) = cache.clear() {
                tracing::warn!(error = %e, "Failed to remove corrupt credential cache");
            }
            Credentials::default()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Credential cache unavailable");
            Credentials::default()
        }
    }
}
