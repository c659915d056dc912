mod backend;
mod base_client;

pub use backend::{
    app_backend_context, AbstractStoreBackend, AppBackendError, AppBackendErrorReason,
    AppBackendFnLabel,
};
pub use base_client::{BaseClientError, BaseClientErrorReason};
