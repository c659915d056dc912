use std::convert::Infallible;
use std::io::{Error as IoError, ErrorKind};
use std::result::Result;
use std::sync::Arc;
use std::time::Duration;

use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Empty, Full};
use hyper::body::Bytes;
use hyper::client::conn::http1::{handshake, SendRequest};
use hyper::header::{HeaderName, HeaderValue, HOST};
use hyper::{Error as HyperError, Method, Request, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_native_tls::{native_tls, TlsConnector};

use crate::logging::{app_log_event, AppLogContext, AppLogLevel};

#[derive(Debug)]
pub enum BaseClientErrorReason {
    TcpNet(ErrorKind, String),
    SysIo(ErrorKind, String),
    Http {
        sender_closed: bool,
        parse_error: bool,
        req_cancelled: bool,
        message_corrupted: bool,
        timeout: bool,
        detail: String,
    },
    HttpRequest(String),
    Tls(String),
    SerialiseFailure(String),
    DeserialiseFailure(Box<String>, u16),
    // fixed per-request deadline from config elapsed, no automatic
    // retry, resubmission is a caller decision
    RespTimeout(u16),
}

impl From<IoError> for BaseClientErrorReason {
    fn from(value: IoError) -> Self {
        let ekind = value.kind();
        match &ekind {
            ErrorKind::TimedOut
            | ErrorKind::AddrInUse
            | ErrorKind::NotConnected
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionRefused
            | ErrorKind::ConnectionAborted => Self::TcpNet(ekind, value.to_string()),
            _others => Self::SysIo(ekind, value.to_string()),
        }
    }
}
impl From<HyperError> for BaseClientErrorReason {
    fn from(value: HyperError) -> Self {
        Self::Http {
            sender_closed: value.is_closed(),
            parse_error: value.is_parse_status() | value.is_parse(),
            timeout: value.is_timeout(),
            message_corrupted: value.is_incomplete_message() | value.is_body_write_aborted(),
            req_cancelled: value.is_canceled(),
            detail: value.to_string(),
        }
    }
}
impl From<native_tls::Error> for BaseClientErrorReason {
    fn from(value: native_tls::Error) -> Self {
        Self::Tls(value.to_string())
    }
}

#[derive(Debug)]
pub struct BaseClientError {
    pub reason: BaseClientErrorReason,
}

type RawRespBody = (Vec<u8>, StatusCode);

// one short-lived HTTP/1.1 connection per logical request, the same way
// the storefront backend expects browsers to behave, no pooling
pub(super) struct BaseClient {
    req_sender: SendRequest<BoxBody<Bytes, Infallible>>,
    logctx: Arc<AppLogContext>,
    host: String,
    port: u16,
    timeout_secs: u16,
}

impl BaseClient {
    pub(super) async fn try_build(
        logctx: Arc<AppLogContext>,
        secure_connector: Option<&TlsConnector>,
        host: String,
        port: u16,
        timeout_secs: u16,
    ) -> Result<Self, BaseClientError> {
        let deadline = Duration::from_secs(timeout_secs as u64);
        let logctx_cpy = logctx.clone();
        let connect_fut = TcpStream::connect((host.as_str(), port));
        let tcp_stream = timeout(deadline, connect_fut)
            .await
            .map_err(|_elapsed| BaseClientError {
                reason: BaseClientErrorReason::RespTimeout(timeout_secs),
            })?
            .map_err(|e| {
                app_log_event!(
                    logctx_cpy,
                    AppLogLevel::ERROR,
                    "tcp-conn-err, {host}:{port}, {:?}",
                    &e
                );
                BaseClientError { reason: e.into() }
            })?;
        let host_cpy = host.clone();
        let req_sender = if let Some(connector) = secure_connector {
            let tls_stream = connector
                .connect(host.as_str(), tcp_stream)
                .await
                .map_err(|e| BaseClientError { reason: e.into() })?;
            let (req_sender, conn) = handshake(TokioIo::new(tls_stream))
                .await
                .map_err(|e| BaseClientError { reason: e.into() })?;
            let _handle = tokio::spawn(async move {
                if let Err(e) = conn.await {
                    app_log_event!(
                        logctx_cpy,
                        AppLogLevel::WARNING,
                        "remote server: {host_cpy}:{port}, {:?}",
                        e
                    );
                }
            });
            req_sender
        } else {
            let (req_sender, conn) = handshake(TokioIo::new(tcp_stream))
                .await
                .map_err(|e| BaseClientError { reason: e.into() })?;
            let _handle = tokio::spawn(async move {
                if let Err(e) = conn.await {
                    app_log_event!(
                        logctx_cpy,
                        AppLogLevel::WARNING,
                        "remote server: {host_cpy}:{port}, {:?}",
                        e
                    );
                }
            });
            req_sender
        };
        Ok(Self {
            req_sender,
            logctx,
            host,
            port,
            timeout_secs,
        })
    } // end of fn try-build

    async fn _execute(
        &mut self,
        req: Request<BoxBody<Bytes, Infallible>>,
    ) -> Result<RawRespBody, BaseClientError> {
        let logctx_p = &self.logctx;
        let uri_log = req.uri().to_string();
        let mut resp = self
            .req_sender
            .send_request(req)
            .await
            .map_err(|e| {
                app_log_event!(logctx_p, AppLogLevel::WARNING, "{:?}", e);
                BaseClientError { reason: e.into() }
            })?;
        let mut raw_collected = Vec::<u8>::new();
        while let Some(nxt) = resp.frame().await {
            let frm = nxt.map_err(|e| BaseClientError { reason: e.into() })?;
            let newchunk = frm.into_data().map_err(|failed_frame| {
                app_log_event!(
                    logctx_p,
                    AppLogLevel::ERROR,
                    "data:{}, trailers:{}",
                    failed_frame.is_data(),
                    failed_frame.is_trailers()
                );
                BaseClientError {
                    reason: BaseClientErrorReason::Http {
                        sender_closed: false,
                        parse_error: true,
                        req_cancelled: false,
                        message_corrupted: false,
                        timeout: false,
                        detail: "frame-corrupted".to_string(),
                    },
                }
            })?;
            raw_collected.extend(newchunk.to_vec());
        } // end of loop
        let status_code = resp.status();
        if status_code.is_client_error() {
            app_log_event!(
                logctx_p,
                AppLogLevel::INFO,
                "server:{}:{}, uri:{}",
                self.host.as_str(),
                self.port,
                uri_log
            );
        } else if status_code.is_server_error() {
            app_log_event!(
                logctx_p,
                AppLogLevel::WARNING,
                "server:{}:{}, uri:{}",
                self.host.as_str(),
                self.port,
                uri_log
            );
        }
        Ok((raw_collected, status_code))
    } // end of fn _execute

    pub(super) async fn execute(
        &mut self,
        path: &str,
        method: Method,
        headers: Vec<(HeaderName, HeaderValue)>,
        rawbody: Option<Vec<u8>>,
    ) -> Result<RawRespBody, BaseClientError> {
        let body = if let Some(v) = rawbody {
            BoxBody::new(Full::new(Bytes::from(v)))
        } else {
            BoxBody::new(Empty::new())
        };
        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .body(body)
            .map_err(|e| BaseClientError {
                reason: BaseClientErrorReason::HttpRequest(e.to_string()),
            })?;
        let hdrs = req.headers_mut();
        headers
            .into_iter()
            .map(|(k, v)| {
                let _old = hdrs.insert(k, v);
            })
            .count();
        // required in case the backend sits behind a reverse proxy
        let _discarded = hdrs.insert(HOST, HeaderValue::from_str(self.host.as_str()).unwrap());
        let deadline = Duration::from_secs(self.timeout_secs as u64);
        match timeout(deadline, self._execute(req)).await {
            Ok(out) => out,
            Err(_elapsed) => Err(BaseClientError {
                reason: BaseClientErrorReason::RespTimeout(self.timeout_secs),
            }),
        }
    } // end of fn execute
} // end of impl BaseClient
