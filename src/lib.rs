pub mod adapter;
pub mod api;
pub mod config;
pub mod constant;
pub mod error;
pub mod logging;
pub mod model;
pub mod usecase;

use std::result::Result;
use std::sync::Arc;

use crate::adapter::{app_backend_context, AbstractStoreBackend, AppBackendError};
use crate::config::AppConfig;
use crate::logging::AppLogContext;
use crate::model::{PricingRuleError, PricingRuleSet};
use crate::usecase::CartStore;

pub type AppLogAlias = String;

pub struct AppSharedState {
    _config: Arc<AppConfig>,
    _log_ctx: Arc<AppLogContext>,
    _backend: Arc<Box<dyn AbstractStoreBackend>>,
    _pricing: PricingRuleSet,
}

#[derive(Debug)]
pub enum ShrStateInitProgress {
    BackendAdapter,
    PricingRules,
}

#[derive(Debug)]
pub struct ShrStateInitError {
    pub progress: ShrStateInitProgress,
}
impl From<AppBackendError> for ShrStateInitError {
    fn from(_value: AppBackendError) -> Self {
        Self {
            progress: ShrStateInitProgress::BackendAdapter,
        }
    }
}
impl From<PricingRuleError> for ShrStateInitError {
    fn from(_value: PricingRuleError) -> Self {
        Self {
            progress: ShrStateInitProgress::PricingRules,
        }
    }
}

impl AppSharedState {
    pub fn new(cfg: AppConfig) -> Result<Self, ShrStateInitError> {
        let logctx = {
            let lc = AppLogContext::new(&cfg.basepath, &cfg.api_client.logging);
            Arc::new(lc)
        };
        let _backend = {
            let b = app_backend_context(&cfg.api_client.backend, logctx.clone())?;
            Arc::new(b)
        };
        let _pricing = PricingRuleSet::try_from(&cfg.api_client.pricing)?;
        Ok(Self {
            _config: Arc::new(cfg),
            _log_ctx: logctx,
            _backend,
            _pricing,
        })
    }

    pub fn backend(&self) -> Arc<Box<dyn AbstractStoreBackend>> {
        self._backend.clone()
    }
    pub fn log_context(&self) -> Arc<AppLogContext> {
        self._log_ctx.clone()
    }
    pub fn config(&self) -> Arc<AppConfig> {
        self._config.clone()
    }
    pub fn pricing_rules(&self) -> PricingRuleSet {
        self._pricing.clone()
    }

    // one cart store per authenticated session, the bearer token is
    // handed in by the auth layer at login time
    pub fn new_cart_store(&self, auth_token: String) -> Arc<CartStore> {
        CartStore::new(self.backend(), self.log_context(), auth_token)
    }
} // end of impl AppSharedState
