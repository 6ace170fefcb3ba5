//! Injected dependencies for the storefront reducer.

use crate::config::StorefrontConfig;
use std::sync::Arc;
use storefront_core::environment::{Clock, IdGenerator, RandomIdGenerator, SystemClock};

/// Environment dependencies for the storefront reducer
#[derive(Clone)]
pub struct StorefrontEnvironment {
    /// Timestamps for placed orders
    pub clock: Arc<dyn Clock>,
    /// Order identifiers
    pub ids: Arc<dyn IdGenerator>,
    /// Settings
    pub config: StorefrontConfig,
}

impl StorefrontEnvironment {
    /// Creates a new `StorefrontEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>, config: StorefrontConfig) -> Self {
        Self { clock, ids, config }
    }

    /// System clock and random base-36 order ids sized by `config`
    #[must_use]
    pub fn production(config: StorefrontConfig) -> Self {
        let ids = RandomIdGenerator::new(config.order_id_length);
        Self::new(Arc::new(SystemClock), Arc::new(ids), config)
    }
}

impl std::fmt::Debug for StorefrontEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontEnvironment")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
