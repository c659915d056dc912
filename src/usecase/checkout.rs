use std::boxed::Box;
use std::result::Result as DefaultResult;
use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;

use crate::adapter::{
    AbstractStoreBackend, AppBackendError, AppBackendErrorReason, BaseClientError,
};
use crate::api::dto::{OrderCreateReqDto, PaymentMethodDto};
use crate::logging::{app_log_event, AppLogContext, AppLogLevel};

use super::{CartStore, ValidationError};

#[derive(Debug)]
pub enum OrderSubmissionError {
    Validation(ValidationError),
    // order creation refused, e.g. empty cart server-side, stock
    // exhausted between refresh and submit, malformed address
    Rejected { status: u16, detail: String },
    Network(BaseClientError),
    CorruptedPayload(String),
}

impl From<AppBackendError> for OrderSubmissionError {
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

// checkout form fields as the UI collects them, before validation and
// billing-address defaulting
pub struct CheckoutFormModel {
    pub shipping_address: String,
    pub billing_address: Option<String>,
    pub payment_method: PaymentMethodDto,
    pub notes: Option<String>,
}

// what the confirmation view needs, totals are the server's final word
// at order-creation time, never a client-side figure
#[derive(Debug)]
pub struct OrderPlacedModel {
    pub order_id: u64,
    pub order_number: String,
    pub total_amount: Decimal,
    pub status: String,
    pub payment_status: Option<String>,
}

pub struct PlaceOrderUseCase {
    pub backend: Arc<Box<dyn AbstractStoreBackend>>,
    pub cart: Arc<CartStore>,
    pub log_ctx: Arc<AppLogContext>,
}

impl PlaceOrderUseCase {
    pub async fn execute(
        &self,
        form: CheckoutFormModel,
    ) -> DefaultResult<OrderPlacedModel, OrderSubmissionError> {
        let req = Self::validate_form(form)?;
        if self.cart.is_empty().await {
            let e = ValidationError::EmptyCart;
            return Err(OrderSubmissionError::Validation(e));
        }
        // line items are implied by the authoritative server-side cart,
        // totals are recomputed there at creation time
        let d_order = self
            .backend
            .create_order(self.cart.auth_token(), req)
            .await?;
        let placed = OrderPlacedModel::try_from(d_order)?;
        let logctx_p = &self.log_ctx;
        app_log_event!(
            logctx_p,
            AppLogLevel::INFO,
            "order-number:{}, status:{}",
            placed.order_number.as_str(),
            placed.status.as_str()
        );
        // failed cart clearing must not roll back a placed order, the
        // server already emptied its cart, drop the local cache anyway
        if let Err(e) = self.cart.clear().await {
            app_log_event!(
                logctx_p,
                AppLogLevel::WARNING,
                "cart-clear-after-order, order-number:{}, {:?}",
                placed.order_number.as_str(),
                e
            );
            self.cart.reset_local().await;
        }
        Ok(placed)
    } // end of fn execute

    fn validate_form(
        form: CheckoutFormModel,
    ) -> DefaultResult<OrderCreateReqDto, OrderSubmissionError> {
        let shipping_address = form.shipping_address.trim().to_string();
        if shipping_address.is_empty() {
            let e = ValidationError::EmptyShippingAddress;
            return Err(OrderSubmissionError::Validation(e));
        }
        let billing_address = form
            .billing_address
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| shipping_address.clone());
        Ok(OrderCreateReqDto {
            shipping_address,
            billing_address,
            payment_method: form.payment_method,
            notes: form.notes,
        })
    }
} // end of impl PlaceOrderUseCase

impl TryFrom<crate::api::dto::OrderCreatedRespDto> for OrderPlacedModel {
    type Error = OrderSubmissionError;
    fn try_from(value: crate::api::dto::OrderCreatedRespDto) -> Result<Self, Self::Error> {
        let total_amount = Decimal::from_str(value.total_amount.to_string().as_str())
            .map_err(|e| OrderSubmissionError::CorruptedPayload(e.to_string()))?;
        Ok(Self {
            order_id: value.id,
            order_number: value.order_number,
            total_amount,
            status: value.status,
            payment_status: value.payment_status,
        })
    }
}
