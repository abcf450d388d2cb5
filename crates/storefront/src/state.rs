//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::flowhub::{FlowhubClient, FlowhubError};
use crate::services::specials::SpecialsStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// Flowhub client, the specials list and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    flowhub: FlowhubClient,
    specials: SpecialsStore,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Specials are seeded from `SPECIALS_SEED_PATH` when it is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the Flowhub client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, FlowhubError> {
        let specials = config
            .specials_seed_path
            .as_deref()
            .map(SpecialsStore::from_seed_file)
            .unwrap_or_default();
        Self::with_specials(config, specials)
    }

    /// Create application state with an explicit specials handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the Flowhub client cannot be built.
    pub fn with_specials(
        config: StorefrontConfig,
        specials: SpecialsStore,
    ) -> Result<Self, FlowhubError> {
        let flowhub = FlowhubClient::new(&config.flowhub)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                flowhub,
                specials,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the Flowhub API client.
    #[must_use]
    pub fn flowhub(&self) -> &FlowhubClient {
        &self.inner.flowhub
    }

    /// Get a reference to the specials list.
    #[must_use]
    pub fn specials(&self) -> &SpecialsStore {
        &self.inner.specials
    }
}
