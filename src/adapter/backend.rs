use std::boxed::Box;
use std::marker::{Send, Sync};
use std::result::Result;
use std::sync::Arc;

use async_trait::async_trait;
use hyper::header::{HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use hyper::{Method, StatusCode};
use serde::de::DeserializeOwned;
use tokio_native_tls::{native_tls, TlsConnector};

use crate::api::dto::{
    CartItemCreateReqDto, CartItemDto, CartSummaryDto, OrderCreateReqDto, OrderCreatedRespDto,
    RemoteErrorDto,
};
use crate::config::AppBackendApiCfg;
use crate::logging::AppLogContext;

use super::base_client::{BaseClient, BaseClientError, BaseClientErrorReason};

const RESOURCE_PATH_CART: &str = "/api/cart";
const RESOURCE_PATH_CART_TOTAL: &str = "/api/cart/total";
const RESOURCE_PATH_ORDERS: &str = "/api/orders";

#[derive(Debug)]
pub enum AppBackendErrorReason {
    InvalidConfig(String),
    LowLvlNet(BaseClientError),
    // non-2xx reply, `detail` is the server-reported human-readable
    // message surfaced to the invoking UI layer
    Rejected { status: u16, detail: String },
    CorruptedPayload(String),
}

#[derive(Debug, Clone, Copy)]
pub enum AppBackendFnLabel {
    TryBuild,
    FetchCartLines,
    FetchCartSummary,
    AddCartLine,
    UpdateLineQuantity,
    DeleteCartLine,
    ClearCart,
    CreateOrder,
}

#[derive(Debug)]
pub struct AppBackendError {
    pub reason: AppBackendErrorReason,
    pub fn_label: AppBackendFnLabel,
}

impl From<BaseClientError> for AppBackendErrorReason {
    fn from(value: BaseClientError) -> Self {
        Self::LowLvlNet(value)
    }
}

// the seven REST operations of the shop-backend contract this client
// depends on, kept behind a trait object so the cart / checkout use
// cases can run against a mock in unit tests
#[async_trait]
pub trait AbstractStoreBackend: Send + Sync {
    async fn fetch_cart_lines(&self, auth_token: &str)
        -> Result<Vec<CartItemDto>, AppBackendError>;

    async fn fetch_cart_summary(&self, auth_token: &str)
        -> Result<CartSummaryDto, AppBackendError>;

    async fn add_cart_line(
        &self,
        auth_token: &str,
        req: CartItemCreateReqDto,
    ) -> Result<CartItemDto, AppBackendError>;

    // the backend takes the new quantity as a query parameter
    async fn update_line_quantity(
        &self,
        auth_token: &str,
        item_id: u64,
        quantity: u32,
    ) -> Result<(), AppBackendError>;

    async fn delete_cart_line(&self, auth_token: &str, item_id: u64)
        -> Result<(), AppBackendError>;

    async fn clear_cart(&self, auth_token: &str) -> Result<(), AppBackendError>;

    async fn create_order(
        &self,
        auth_token: &str,
        req: OrderCreateReqDto,
    ) -> Result<OrderCreatedRespDto, AppBackendError>;
}

struct AppStoreBackend {
    _host: String,
    _port: u16,
    _timeout_secs: u16,
    _secure_connector: Option<TlsConnector>,
    _logctx: Arc<AppLogContext>,
}

pub fn app_backend_context(
    cfg: &AppBackendApiCfg,
    logctx: Arc<AppLogContext>,
) -> Result<Box<dyn AbstractStoreBackend>, AppBackendError> {
    let secure_connector = if cfg.secure_conn {
        let lowlvl = native_tls::TlsConnector::builder()
            .build()
            .map_err(|e| AppBackendError {
                reason: AppBackendErrorReason::InvalidConfig(e.to_string()),
                fn_label: AppBackendFnLabel::TryBuild,
            })?;
        Some(TlsConnector::from(lowlvl))
    } else {
        None
    };
    let obj = AppStoreBackend {
        _host: cfg.host.clone(),
        _port: cfg.port,
        _timeout_secs: cfg.timeout_secs,
        _secure_connector: secure_connector,
        _logctx: logctx,
    };
    Ok(Box::new(obj))
}

impl AppStoreBackend {
    fn common_headers(
        auth_token: &str,
        has_body: bool,
    ) -> Result<Vec<(HeaderName, HeaderValue)>, AppBackendErrorReason> {
        let bearer = {
            let s = format!("Bearer {auth_token}");
            HeaderValue::from_str(s.as_str())
                .map_err(|e| AppBackendErrorReason::InvalidConfig(e.to_string()))?
        };
        let mut out = vec![
            (AUTHORIZATION, bearer),
            (ACCEPT, HeaderValue::from_static("application/json")),
        ];
        if has_body {
            out.push((
                CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            ));
        }
        Ok(out)
    }

    async fn _send(
        &self,
        fn_label: AppBackendFnLabel,
        path: &str,
        method: Method,
        auth_token: &str,
        rawbody: Option<Vec<u8>>,
    ) -> Result<(Vec<u8>, StatusCode), AppBackendError> {
        let wrap = |reason: AppBackendErrorReason, fn_label: AppBackendFnLabel| AppBackendError {
            reason,
            fn_label,
        };
        let headers =
            Self::common_headers(auth_token, rawbody.is_some()).map_err(|r| wrap(r, fn_label))?;
        let mut client = BaseClient::try_build(
            self._logctx.clone(),
            self._secure_connector.as_ref(),
            self._host.clone(),
            self._port,
            self._timeout_secs,
        )
        .await
        .map_err(|e| wrap(e.into(), fn_label))?;
        let (raw, status) = client
            .execute(path, method, headers, rawbody)
            .await
            .map_err(|e| wrap(e.into(), fn_label))?;
        if status.is_success() {
            Ok((raw, status))
        } else {
            let detail = serde_json::from_slice::<RemoteErrorDto>(raw.as_slice())
                .ok()
                .and_then(|e| e.detail)
                .unwrap_or_else(|| String::from_utf8_lossy(raw.as_slice()).to_string());
            Err(wrap(
                AppBackendErrorReason::Rejected {
                    status: status.as_u16(),
                    detail,
                },
                fn_label,
            ))
        }
    } // end of fn _send

    fn decode_json<T: DeserializeOwned>(
        raw: &[u8],
        status: StatusCode,
        fn_label: AppBackendFnLabel,
    ) -> Result<T, AppBackendError> {
        serde_json::from_slice::<T>(raw).map_err(|e| AppBackendError {
            reason: AppBackendErrorReason::LowLvlNet(BaseClientError {
                reason: BaseClientErrorReason::DeserialiseFailure(
                    Box::new(e.to_string()),
                    status.as_u16(),
                ),
            }),
            fn_label,
        })
    }
} // end of impl AppStoreBackend

#[async_trait]
impl AbstractStoreBackend for AppStoreBackend {
    async fn fetch_cart_lines(
        &self,
        auth_token: &str,
    ) -> Result<Vec<CartItemDto>, AppBackendError> {
        let (raw, status) = self
            ._send(
                AppBackendFnLabel::FetchCartLines,
                RESOURCE_PATH_CART,
                Method::GET,
                auth_token,
                None,
            )
            .await?;
        Self::decode_json(raw.as_slice(), status, AppBackendFnLabel::FetchCartLines)
    }

    async fn fetch_cart_summary(
        &self,
        auth_token: &str,
    ) -> Result<CartSummaryDto, AppBackendError> {
        let (raw, status) = self
            ._send(
                AppBackendFnLabel::FetchCartSummary,
                RESOURCE_PATH_CART_TOTAL,
                Method::GET,
                auth_token,
                None,
            )
            .await?;
        Self::decode_json(raw.as_slice(), status, AppBackendFnLabel::FetchCartSummary)
    }

    async fn add_cart_line(
        &self,
        auth_token: &str,
        req: CartItemCreateReqDto,
    ) -> Result<CartItemDto, AppBackendError> {
        let rawbody = serde_json::to_vec(&req).map_err(|e| AppBackendError {
            reason: AppBackendErrorReason::LowLvlNet(BaseClientError {
                reason: BaseClientErrorReason::SerialiseFailure(e.to_string()),
            }),
            fn_label: AppBackendFnLabel::AddCartLine,
        })?;
        let (raw, status) = self
            ._send(
                AppBackendFnLabel::AddCartLine,
                RESOURCE_PATH_CART,
                Method::POST,
                auth_token,
                Some(rawbody),
            )
            .await?;
        Self::decode_json(raw.as_slice(), status, AppBackendFnLabel::AddCartLine)
    }

    async fn update_line_quantity(
        &self,
        auth_token: &str,
        item_id: u64,
        quantity: u32,
    ) -> Result<(), AppBackendError> {
        let path = format!("{RESOURCE_PATH_CART}/{item_id}?quantity={quantity}");
        let _resp = self
            ._send(
                AppBackendFnLabel::UpdateLineQuantity,
                path.as_str(),
                Method::PUT,
                auth_token,
                None,
            )
            .await?;
        Ok(())
    }

    async fn delete_cart_line(
        &self,
        auth_token: &str,
        item_id: u64,
    ) -> Result<(), AppBackendError> {
        let path = format!("{RESOURCE_PATH_CART}/{item_id}");
        let _resp = self
            ._send(
                AppBackendFnLabel::DeleteCartLine,
                path.as_str(),
                Method::DELETE,
                auth_token,
                None,
            )
            .await?;
        Ok(())
    }

    async fn clear_cart(&self, auth_token: &str) -> Result<(), AppBackendError> {
        let _resp = self
            ._send(
                AppBackendFnLabel::ClearCart,
                RESOURCE_PATH_CART,
                Method::DELETE,
                auth_token,
                None,
            )
            .await?;
        Ok(())
    }

    async fn create_order(
        &self,
        auth_token: &str,
        req: OrderCreateReqDto,
    ) -> Result<OrderCreatedRespDto, AppBackendError> {
        let rawbody = serde_json::to_vec(&req).map_err(|e| AppBackendError {
            reason: AppBackendErrorReason::LowLvlNet(BaseClientError {
                reason: BaseClientErrorReason::SerialiseFailure(e.to_string()),
            }),
            fn_label: AppBackendFnLabel::CreateOrder,
        })?;
        let (raw, status) = self
            ._send(
                AppBackendFnLabel::CreateOrder,
                RESOURCE_PATH_ORDERS,
                Method::POST,
                auth_token,
                Some(rawbody),
            )
            .await?;
        Self::decode_json(raw.as_slice(), status, AppBackendFnLabel::CreateOrder)
    }
} // end of impl AppStoreBackend
