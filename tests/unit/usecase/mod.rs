
use std::boxed::Box;
use std::collections::VecDeque;
use std::result::Result;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use storefront::adapter::{
    AbstractStoreBackend, AppBackendError, AppBackendErrorReason, AppBackendFnLabel,
    BaseClientError, BaseClientErrorReason,
};
use storefront::api::dto::{
    CartItemCreateReqDto, CartItemDto, CartSummaryDto, OrderCreateReqDto, OrderCreatedRespDto,
};

pub(crate) struct MockStoreBackend {
    fetch_lines_results: Mutex<VecDeque<Result<Vec<CartItemDto>, AppBackendError>>>,
    fetch_summary_results: Mutex<VecDeque<Result<CartSummaryDto, AppBackendError>>>,
    add_line_results: Mutex<VecDeque<Result<CartItemDto, AppBackendError>>>,
    update_qty_results: Mutex<VecDeque<Result<(), AppBackendError>>>,
    delete_line_results: Mutex<VecDeque<Result<(), AppBackendError>>>,
    clear_results: Mutex<VecDeque<Result<(), AppBackendError>>>,
    create_order_results: Mutex<VecDeque<Result<OrderCreatedRespDto, AppBackendError>>>,
    // last order-creation payload, for asserting billing-address defaulting
    order_req_log: Mutex<Option<OrderCreateReqDto>>,
    num_requests: AtomicU32,
}

// the store under test owns the mock through a trait object, the test
// body keeps a second handle for seeding expectations and asserting
// call counts
pub(crate) fn ut_mock_backend() -> (Arc<MockStoreBackend>, Arc<Box<dyn AbstractStoreBackend>>) {
    let mock = Arc::new(MockStoreBackend::new());
    let boxed: Box<dyn AbstractStoreBackend> = Box::new(MockStoreBackendHandle(mock.clone()));
    (mock, Arc::new(boxed))
}

// local newtype so the foreign trait can be implemented for a shared
// handle without violating the orphan rule (`Arc` is not fundamental)
pub(crate) struct MockStoreBackendHandle(Arc<MockStoreBackend>);

impl MockStoreBackend {
    pub(crate) fn new() -> Self {
        Self {
            fetch_lines_results: Mutex::new(VecDeque::new()),
            fetch_summary_results: Mutex::new(VecDeque::new()),
            add_line_results: Mutex::new(VecDeque::new()),
            update_qty_results: Mutex::new(VecDeque::new()),
            delete_line_results: Mutex::new(VecDeque::new()),
            clear_results: Mutex::new(VecDeque::new()),
            create_order_results: Mutex::new(VecDeque::new()),
            order_req_log: Mutex::new(None),
            num_requests: AtomicU32::new(0),
        }
    }

    pub(crate) fn expect_fetch_lines(&self, r: Result<Vec<CartItemDto>, AppBackendError>) {
        self.fetch_lines_results.lock().unwrap().push_back(r);
    }
    pub(crate) fn expect_fetch_summary(&self, r: Result<CartSummaryDto, AppBackendError>) {
        self.fetch_summary_results.lock().unwrap().push_back(r);
    }
    pub(crate) fn expect_add_line(&self, r: Result<CartItemDto, AppBackendError>) {
        self.add_line_results.lock().unwrap().push_back(r);
    }
    pub(crate) fn expect_update_qty(&self, r: Result<(), AppBackendError>) {
        self.update_qty_results.lock().unwrap().push_back(r);
    }
    pub(crate) fn expect_delete_line(&self, r: Result<(), AppBackendError>) {
        self.delete_line_results.lock().unwrap().push_back(r);
    }
    pub(crate) fn expect_clear(&self, r: Result<(), AppBackendError>) {
        self.clear_results.lock().unwrap().push_back(r);
    }
    pub(crate) fn expect_create_order(&self, r: Result<OrderCreatedRespDto, AppBackendError>) {
        self.create_order_results.lock().unwrap().push_back(r);
    }

    pub(crate) fn num_requests_seen(&self) -> u32 {
        self.num_requests.load(Ordering::Relaxed)
    }
    pub(crate) fn last_order_req(&self) -> Option<OrderCreateReqDto> {
        self.order_req_log.lock().unwrap().take()
    }
}

#[async_trait]
impl AbstractStoreBackend for MockStoreBackendHandle {
    async fn fetch_cart_lines(
        &self,
        _auth_token: &str,
    ) -> Result<Vec<CartItemDto>, AppBackendError> {
        let _num = self.0.num_requests.fetch_add(1, Ordering::Relaxed);
        let mut g = self.0.fetch_lines_results.lock().unwrap();
        g.pop_front().unwrap()
    }
    async fn fetch_cart_summary(
        &self,
        _auth_token: &str,
    ) -> Result<CartSummaryDto, AppBackendError> {
        let _num = self.0.num_requests.fetch_add(1, Ordering::Relaxed);
        let mut g = self.0.fetch_summary_results.lock().unwrap();
        g.pop_front().unwrap()
    }
    async fn add_cart_line(
        &self,
        _auth_token: &str,
        _req: CartItemCreateReqDto,
    ) -> Result<CartItemDto, AppBackendError> {
        let _num = self.0.num_requests.fetch_add(1, Ordering::Relaxed);
        let mut g = self.0.add_line_results.lock().unwrap();
        g.pop_front().unwrap()
    }
    async fn update_line_quantity(
        &self,
        _auth_token: &str,
        _item_id: u64,
        _quantity: u32,
    ) -> Result<(), AppBackendError> {
        let _num = self.0.num_requests.fetch_add(1, Ordering::Relaxed);
        let mut g = self.0.update_qty_results.lock().unwrap();
        g.pop_front().unwrap()
    }
    async fn delete_cart_line(
        &self,
        _auth_token: &str,
        _item_id: u64,
    ) -> Result<(), AppBackendError> {
        let _num = self.0.num_requests.fetch_add(1, Ordering::Relaxed);
        let mut g = self.0.delete_line_results.lock().unwrap();
        g.pop_front().unwrap()
    }
    async fn clear_cart(&self, _auth_token: &str) -> Result<(), AppBackendError> {
        let _num = self.0.num_requests.fetch_add(1, Ordering::Relaxed);
        let mut g = self.0.clear_results.lock().unwrap();
        g.pop_front().unwrap()
    }
    async fn create_order(
        &self,
        _auth_token: &str,
        req: OrderCreateReqDto,
    ) -> Result<OrderCreatedRespDto, AppBackendError> {
        let _num = self.0.num_requests.fetch_add(1, Ordering::Relaxed);
        let _old = self.0.order_req_log.lock().unwrap().replace(req);
        let mut g = self.0.create_order_results.lock().unwrap();
        g.pop_front().unwrap()
    }
} // end of impl MockStoreBackend

pub(crate) fn ut_rejected_error(
    fn_label: AppBackendFnLabel,
    status: u16,
    detail: &str,
) -> AppBackendError {
    AppBackendError {
        reason: AppBackendErrorReason::Rejected {
            status,
            detail: detail.to_string(),
        },
        fn_label,
    }
}

pub(crate) fn ut_network_error(fn_label: AppBackendFnLabel) -> AppBackendError {
    AppBackendError {
        reason: AppBackendErrorReason::LowLvlNet(BaseClientError {
            reason: BaseClientErrorReason::TcpNet(
                std::io::ErrorKind::ConnectionRefused,
                "mock-conn-refused".to_string(),
            ),
        }),
        fn_label,
    }
}
