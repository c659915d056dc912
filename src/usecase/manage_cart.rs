use std::boxed::Box;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::sync::{Mutex, RwLock};

use crate::adapter::{
    AbstractStoreBackend, AppBackendError, AppBackendErrorReason, BaseClientError,
};
use crate::api::dto::CartItemCreateReqDto;
use crate::constant::hard_limit;
use crate::logging::{app_log_event, AppLogContext, AppLogLevel};
use crate::model::{CartModel, CartModelError};

use super::ValidationError;

#[derive(Debug)]
pub enum CartMutationError {
    Validation(ValidationError),
    // the remote API refused the mutation, e.g. inactive product,
    // stock exhausted, stale item id
    Rejected { status: u16, detail: String },
    Network(BaseClientError),
    CorruptedPayload(String),
}

impl From<AppBackendError> for CartMutationError {
    fn from(value: AppBackendError) -> Self {
        match value.reason {
            AppBackendErrorReason::Rejected { status, detail } => Self::Rejected { status, detail },
            AppBackendErrorReason::LowLvlNet(e) => Self::Network(e),
            AppBackendErrorReason::InvalidConfig(d) | AppBackendErrorReason::CorruptedPayload(d) => {
                Self::CorruptedPayload(d)
            }
        }
    }
}
impl From<CartModelError> for CartMutationError {
    fn from(value: CartModelError) -> Self {
        Self::CorruptedPayload(format!("{value:?}"))
    }
}

// single writer surface over the session cart cache, views read through
// cloned snapshots, only the methods below may mutate the state.
// every mutation is confirmed by the server first, then the cache is
// re-read wholesale, the server response is always the final word and
// no optimistic local patch is ever committed
pub struct CartStore {
    backend: Arc<Box<dyn AbstractStoreBackend>>,
    logctx: Arc<AppLogContext>,
    auth_token: String,
    state: RwLock<CartModel>,
    // serialises mutations fired from independent UI events, prevents
    // the lost-update race between rapid quantity changes on one cart
    mutate_guard: Mutex<()>,
}

impl CartStore {
    pub fn new(
        backend: Arc<Box<dyn AbstractStoreBackend>>,
        logctx: Arc<AppLogContext>,
        auth_token: String,
    ) -> Arc<Self> {
        Arc::new(Self {
            backend,
            logctx,
            auth_token,
            state: RwLock::new(CartModel::default()),
            mutate_guard: Mutex::new(()),
        })
    }

    pub fn auth_token(&self) -> &str {
        self.auth_token.as_str()
    }

    pub async fn snapshot(&self) -> CartModel {
        let guard = self.state.read().await;
        guard.clone()
    }

    // total number of units, rendered on the navigation chrome badge
    pub async fn unit_count(&self) -> u32 {
        let guard = self.state.read().await;
        guard.unit_count
    }

    pub async fn server_total(&self) -> Decimal {
        let guard = self.state.read().await;
        guard.server_total
    }

    pub async fn is_empty(&self) -> bool {
        let guard = self.state.read().await;
        guard.is_empty()
    }

    // replaces local state wholesale with what the server reports,
    // called after every mutating operation to avoid drift from
    // server-enforced stock / pricing rules
    pub async fn refresh(&self) -> DefaultResult<(), CartMutationError> {
        let token = self.auth_token.as_str();
        let d_lines = self.backend.fetch_cart_lines(token).await?;
        let d_summary = self.backend.fetch_cart_summary(token).await?;
        let newstate = CartModel::try_from_parts(d_lines, d_summary)?;
        let logctx_p = &self.logctx;
        app_log_event!(
            logctx_p,
            AppLogLevel::DEBUG,
            "num-lines:{}, unit-count:{}",
            newstate.num_lines(),
            newstate.unit_count
        );
        let mut guard = self.state.write().await;
        *guard = newstate;
        Ok(())
    }

    pub async fn add_item(
        &self,
        product_id: u64,
        quantity: u32,
    ) -> DefaultResult<(), CartMutationError> {
        if quantity < hard_limit::MIN_LINE_QUANTITY {
            let e = ValidationError::QuantityBelowMinimum { given: quantity };
            return Err(CartMutationError::Validation(e));
        }
        let _g = self.mutate_guard.lock().await;
        let req = CartItemCreateReqDto {
            product_id,
            quantity,
        };
        let _line = self.backend.add_cart_line(self.auth_token(), req).await?;
        self.refresh().await
    }

    pub async fn update_item_quantity(
        &self,
        item_id: u64,
        quantity: u32,
    ) -> DefaultResult<(), CartMutationError> {
        // rejected locally, the backend treats quantity zero as removal
        // and this store never relies on that shortcut
        if quantity < hard_limit::MIN_LINE_QUANTITY {
            let e = ValidationError::QuantityBelowMinimum { given: quantity };
            return Err(CartMutationError::Validation(e));
        }
        let _g = self.mutate_guard.lock().await;
        self.backend
            .update_line_quantity(self.auth_token(), item_id, quantity)
            .await?;
        self.refresh().await
    }

    pub async fn remove_item(&self, item_id: u64) -> DefaultResult<(), CartMutationError> {
        let _g = self.mutate_guard.lock().await;
        self.backend
            .delete_cart_line(self.auth_token(), item_id)
            .await?;
        self.refresh().await
    }

    // terminal, the outcome is known immediately, local state resets
    // without waiting for a subsequent refresh
    pub async fn clear(&self) -> DefaultResult<(), CartMutationError> {
        let _g = self.mutate_guard.lock().await;
        self.backend.clear_cart(self.auth_token()).await?;
        self.reset_local().await;
        Ok(())
    }

    pub(super) async fn reset_local(&self) {
        let mut guard = self.state.write().await;
        *guard = CartModel::default();
    }
} // end of impl CartStore
