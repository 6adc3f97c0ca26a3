//! Drives one transport exchange to exactly one outcome.
//!
//! # Design
//! An execution moves `Idle -> Configured -> Sent -> Settled`. Completion,
//! network error, timeout and cancellation all race towards `Settled`; the
//! first to take the settlement lock wins and every later event is dropped.
//! Settling releases the transport handle, the result channel and the cancel
//! token subscription, so nothing that fires afterwards can observe or change
//! the outcome.
//!
//! `execute` does no waiting of its own. It returns a `PendingResponse`
//! straight away and all further progress happens inside the transport's
//! event callbacks.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::sync::oneshot;
use tracing::{debug, trace};
use uuid::Uuid;

use crate::cancel::{Cancel, CancelToken, Subscription};
use crate::env::Environment;
use crate::error::{create_error, RequestError, RequestResult, ECONNABORTED};
use crate::headers::{parse_headers, process_headers};
use crate::http::{ResponseData, ResponseType};
use crate::transport::{ReadyState, Transport, TransportFactory, TransportListener};
use crate::types::{ProgressEvent, RequestConfig, Response};
use crate::url_builder::build_url;
use crate::validate::validate_status;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Idle,
    Configured,
    Sent,
    Settled,
}

struct Inner {
    stage: Stage,
    transport: Option<Arc<dyn Transport>>,
    settle: Option<oneshot::Sender<RequestResult>>,
    watch: Option<(CancelToken, Subscription)>,
}

/// State shared between the pending handle and the transport's callbacks.
struct Execution {
    id: Uuid,
    config: Arc<RequestConfig>,
    inner: Mutex<Inner>,
}

impl Execution {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// `false` if the execution has already settled.
    fn advance(&self, stage: Stage) -> bool {
        let mut inner = self.lock();
        if inner.stage == Stage::Settled {
            return false;
        }
        trace!(request_id = %self.id, from = ?inner.stage, to = ?stage, "stage");
        inner.stage = stage;
        true
    }

    /// Remember the cancel subscription so settling can release it.
    fn watch(&self, token: &CancelToken, subscription: Subscription) {
        let mut inner = self.lock();
        if inner.stage == Stage::Settled {
            drop(inner);
            token.unsubscribe(subscription);
        } else {
            inner.watch = Some((token.clone(), subscription));
        }
    }

    fn is_settled(&self) -> bool {
        self.lock().stage == Stage::Settled
    }

    /// The transport, unless the execution has already settled.
    fn live_transport(&self) -> Option<Arc<dyn Transport>> {
        let inner = self.lock();
        if inner.stage == Stage::Settled {
            return None;
        }
        inner.transport.clone()
    }

    /// Move to `Settled` and take what settling releases. `None` if another
    /// event got there first.
    #[allow(clippy::type_complexity)]
    fn take_settlement(
        &self,
    ) -> Option<(oneshot::Sender<RequestResult>, Option<Arc<dyn Transport>>)> {
        let (settlement, watch) = {
            let mut inner = self.lock();
            if inner.stage == Stage::Settled {
                return None;
            }
            inner.stage = Stage::Settled;
            let transport = inner.transport.take();
            let settlement = inner.settle.take().map(|tx| (tx, transport));
            (settlement, inner.watch.take())
        };
        if let Some((token, subscription)) = watch {
            token.unsubscribe(subscription);
        }
        settlement
    }

    fn settle(&self, result: RequestResult) {
        let Some((tx, _transport)) = self.take_settlement() else {
            trace!(request_id = %self.id, "ignoring outcome after settlement");
            return;
        };
        match &result {
            Ok(response) => debug!(request_id = %self.id, status = response.status, "resolved"),
            Err(err) => debug!(request_id = %self.id, error = %err, "rejected"),
        }
        // The receiver may already be gone; the outcome is then simply dropped.
        let _ = tx.send(result);
    }

    fn reject(&self, message: String, code: Option<&str>, transport: Option<Arc<dyn Transport>>) {
        let err = create_error(message, self.config.clone(), code, transport, None);
        self.settle(Err(err.into()));
    }

    /// Cancellation controller: abort the transport and pass the reason through.
    fn cancel(&self, reason: Cancel) {
        let Some((tx, transport)) = self.take_settlement() else {
            trace!(request_id = %self.id, "cancellation after settlement ignored");
            return;
        };
        debug!(request_id = %self.id, reason = %reason, "cancelled");
        if let Some(transport) = transport {
            transport.abort();
        }
        let _ = tx.send(Err(RequestError::Cancelled(reason)));
    }

    fn complete(&self, transport: Arc<dyn Transport>) {
        let status = transport.status();
        let wants_raw = self
            .config
            .response_type
            .is_some_and(|t| t != ResponseType::Text);
        let data = if wants_raw {
            transport.response()
        } else {
            ResponseData::Text(transport.response_text())
        };
        let response = Response {
            data,
            status,
            status_text: transport.status_text(),
            headers: parse_headers(&transport.response_headers()),
            config: self.config.clone(),
            transport: transport.clone(),
        };

        if validate_status(status, self.config.validate_status.as_ref()) {
            self.settle(Ok(response));
        } else {
            let err = create_error(
                format!("Request failed with status code {status}"),
                self.config.clone(),
                None,
                Some(transport),
                Some(response),
            );
            self.settle(Err(err.into()));
        }
    }
}

impl Drop for Execution {
    fn drop(&mut self) {
        let inner = self.inner.get_mut().unwrap_or_else(|e| e.into_inner());
        if let Some((token, subscription)) = inner.watch.take() {
            token.unsubscribe(subscription);
        }
    }
}

impl TransportListener for Execution {
    fn ready_state_changed(&self) {
        let Some(transport) = self.live_transport() else {
            return;
        };
        // Aborted before any status line arrived.
        if transport.status() == 0 {
            trace!(request_id = %self.id, "ignoring ready state with status 0");
            return;
        }
        if transport.ready_state() != ReadyState::Done {
            return;
        }
        self.complete(transport);
    }

    fn error(&self) {
        let transport = self.live_transport();
        self.reject("Network Error".to_string(), None, transport);
    }

    fn timeout(&self) {
        let transport = self.live_transport();
        self.reject(
            format!("Timeout of {} ms exceeded", self.config.timeout),
            Some(ECONNABORTED),
            transport,
        );
    }

    fn download_progress(&self, event: ProgressEvent) {
        if let Some(callback) = &self.config.on_download_progress {
            if !self.is_settled() {
                callback(&event);
            }
        }
    }

    fn upload_progress(&self, event: ProgressEvent) {
        if let Some(callback) = &self.config.on_upload_progress {
            if !self.is_settled() {
                callback(&event);
            }
        }
    }
}

/// Eventually resolves with the execution's single outcome.
#[must_use = "the outcome is lost unless the pending response is awaited"]
pub struct PendingResponse {
    id: Uuid,
    config: Arc<RequestConfig>,
    rx: oneshot::Receiver<RequestResult>,
}

impl PendingResponse {
    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl Future for PendingResponse {
    type Output = RequestResult;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = &mut *self;
        match Pin::new(&mut this.rx).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            // Sender dropped unsent: the transport let go of its listener
            // without reporting an outcome.
            Poll::Ready(Err(_)) => Poll::Ready(Err(create_error(
                "Request dropped before completion",
                this.config.clone(),
                None,
                None,
                None,
            )
            .into())),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Runs requests over transports created by a `TransportFactory`.
#[derive(Clone)]
pub struct RequestExecutor {
    factory: Arc<dyn TransportFactory>,
    env: Environment,
}

impl RequestExecutor {
    pub fn new<F>(factory: F) -> Self
    where
        F: TransportFactory + 'static,
    {
        Self {
            factory: Arc::new(factory),
            env: Environment::default(),
        }
    }

    pub fn with_environment(mut self, env: Environment) -> Self {
        self.env = env;
        self
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// Start `config` on a fresh transport.
    pub fn execute(&self, config: RequestConfig) -> PendingResponse {
        let config = Arc::new(config);
        let id = Uuid::new_v4();
        let (tx, rx) = oneshot::channel();
        let transport = self.factory.create();

        let execution = Arc::new(Execution {
            id,
            config: config.clone(),
            inner: Mutex::new(Inner {
                stage: Stage::Idle,
                transport: Some(transport.clone()),
                settle: Some(tx),
                watch: None,
            }),
        });
        let pending = PendingResponse { id, config: config.clone(), rx };

        let url = build_url(&config.url, &config.params);
        debug!(request_id = %id, method = %config.method, url = %url, "open");
        if let Err(err) = transport.open(config.method, &url) {
            execution.reject(err.to_string(), None, Some(transport));
            return pending;
        }

        if let Some(response_type) = config.response_type {
            transport.set_response_type(response_type);
        }
        if config.timeout > 0 {
            transport.set_timeout(Duration::from_millis(config.timeout));
        }
        if config.with_credentials {
            transport.set_with_credentials(true);
        }
        execution.advance(Stage::Configured);

        for (name, value) in process_headers(&config, &url, &self.env) {
            transport.set_request_header(&name, &value);
        }

        if let Some(token) = &config.cancel_token {
            let watcher: Weak<Execution> = Arc::downgrade(&execution);
            let subscription = token.subscribe(move |reason| {
                if let Some(execution) = watcher.upgrade() {
                    execution.cancel(reason);
                }
            });
            execution.watch(token, subscription);
        }
        // A cancel landing after this point aborts the transport before or
        // during `send`; transports treat `send` after `abort` as a no-op.
        if !execution.advance(Stage::Sent) {
            return pending;
        }

        debug!(request_id = %id, "send");
        let listener: Arc<dyn TransportListener> = execution;
        transport.send(config.data.clone(), listener);
        pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::CancelToken;
    use crate::cookie::CookieHeader;
    use crate::error::ErrorKind;
    use crate::http::{HttpMethod, RequestBody};
    use crate::transport::TransportError;
    use crate::types::BasicAuth;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use url::Url;

    #[derive(Debug, Default)]
    struct Recorded {
        method: Option<HttpMethod>,
        url: Option<String>,
        response_type: Option<ResponseType>,
        timeout: Option<Duration>,
        with_credentials: bool,
        headers: Vec<(String, String)>,
        body: Option<Option<RequestBody>>,
        aborted: bool,
        ready_state: ReadyState,
        status: u16,
        status_text: String,
        raw_headers: String,
        text: String,
        response: Option<ResponseData>,
    }

    /// In-memory transport driven by the test.
    #[derive(Default)]
    struct ScriptedTransport {
        fail_open: bool,
        state: Mutex<Recorded>,
        listener: Mutex<Option<Arc<dyn TransportListener>>>,
    }

    impl std::fmt::Debug for ScriptedTransport {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("ScriptedTransport")
                .field("state", &self.state)
                .finish_non_exhaustive()
        }
    }

    impl ScriptedTransport {
        fn state(&self) -> MutexGuard<'_, Recorded> {
            self.state.lock().unwrap()
        }

        fn listener(&self) -> Arc<dyn TransportListener> {
            self.listener.lock().unwrap().clone().expect("send was not called")
        }

        fn respond(&self, status: u16, status_text: &str, headers: &str, text: &str) {
            {
                let mut s = self.state();
                s.status = status;
                s.status_text = status_text.to_string();
                s.raw_headers = headers.to_string();
                s.text = text.to_string();
                s.ready_state = ReadyState::HeadersReceived;
            }
            self.listener().ready_state_changed();
            self.state().ready_state = ReadyState::Loading;
            self.listener().ready_state_changed();
            self.state().ready_state = ReadyState::Done;
            self.listener().ready_state_changed();
        }
    }

    impl Transport for ScriptedTransport {
        fn open(&self, method: HttpMethod, url: &str) -> Result<(), TransportError> {
            if self.fail_open {
                return Err(TransportError::InvalidUrl {
                    url: url.to_string(),
                    reason: "unsupported".to_string(),
                });
            }
            let mut s = self.state();
            s.method = Some(method);
            s.url = Some(url.to_string());
            s.ready_state = ReadyState::Opened;
            Ok(())
        }
        fn set_response_type(&self, response_type: ResponseType) {
            self.state().response_type = Some(response_type);
        }
        fn set_timeout(&self, timeout: Duration) {
            self.state().timeout = Some(timeout);
        }
        fn set_with_credentials(&self, with_credentials: bool) {
            self.state().with_credentials = with_credentials;
        }
        fn set_request_header(&self, name: &str, value: &str) {
            self.state().headers.push((name.to_string(), value.to_string()));
        }
        fn send(&self, body: Option<RequestBody>, listener: Arc<dyn TransportListener>) {
            if self.state().aborted {
                return;
            }
            self.state().body = Some(body);
            *self.listener.lock().unwrap() = Some(listener);
        }
        fn abort(&self) {
            let mut s = self.state();
            s.aborted = true;
            s.status = 0;
            s.ready_state = ReadyState::Unsent;
        }
        fn ready_state(&self) -> ReadyState {
            self.state().ready_state
        }
        fn status(&self) -> u16 {
            self.state().status
        }
        fn status_text(&self) -> String {
            self.state().status_text.clone()
        }
        fn response_headers(&self) -> String {
            self.state().raw_headers.clone()
        }
        fn response_text(&self) -> String {
            self.state().text.clone()
        }
        fn response(&self) -> ResponseData {
            self.state().response.clone().unwrap_or_default()
        }
    }

    /// Executor whose factory always hands out `transport`.
    fn executor_for(transport: &Arc<ScriptedTransport>) -> RequestExecutor {
        let transport = transport.clone();
        RequestExecutor::new(move || -> Arc<dyn Transport> { transport.clone() })
    }

    fn setup() -> (Arc<ScriptedTransport>, RequestExecutor) {
        let transport = Arc::new(ScriptedTransport::default());
        let executor = executor_for(&transport);
        (transport, executor)
    }

    #[tokio::test]
    async fn resolves_on_done_with_2xx() {
        let (transport, executor) = setup();
        let pending = executor.execute(RequestConfig::new("/api").param("id", 5));
        transport.respond(200, "OK", "Content-Type: application/json\r\n", r#"{"ok":true}"#);

        let response = pending.await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.status_text, "OK");
        assert_eq!(response.data, ResponseData::Text(r#"{"ok":true}"#.to_string()));
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert_eq!(response.config.url, "/api");
        assert_eq!(transport.state().url.as_deref(), Some("/api?id=5"));
        assert_eq!(transport.state().method, Some(HttpMethod::Get));
    }

    #[tokio::test]
    async fn non_text_response_type_reads_raw_response() {
        let (transport, executor) = setup();
        transport.state().response = Some(ResponseData::Json(serde_json::json!({"ok": true})));
        let pending = executor.execute(RequestConfig::new("/api").response_type(ResponseType::Json));
        transport.respond(200, "OK", "", "ignored");

        let response = pending.await.unwrap();
        assert_eq!(response.data, ResponseData::Json(serde_json::json!({"ok": true})));
        assert_eq!(transport.state().response_type, Some(ResponseType::Json));
    }

    #[tokio::test]
    async fn rejects_status_outside_validator() {
        let (transport, executor) = setup();
        let pending = executor.execute(RequestConfig::new("/api"));
        transport.respond(500, "Internal Server Error", "", "oops");

        let err = pending.await.unwrap_err().into_client_error().unwrap();
        assert!(err.message.contains("500"));
        assert_eq!(err.kind(), ErrorKind::RejectedStatus);
        assert_eq!(err.code, None);
        let response = err.response.as_ref().unwrap();
        assert_eq!(response.status, 500);
        assert_eq!(response.data, ResponseData::Text("oops".to_string()));
    }

    #[tokio::test]
    async fn custom_validator_accepts_404() {
        let (transport, executor) = setup();
        let pending = executor.execute(RequestConfig::new("/api").validate_status(|s| s < 500));
        transport.respond(404, "Not Found", "", "");
        assert_eq!(pending.await.unwrap().status, 404);
    }

    #[tokio::test]
    async fn network_error_has_no_code() {
        let (transport, executor) = setup();
        let pending = executor.execute(RequestConfig::new("/api"));
        transport.listener().error();

        let err = pending.await.unwrap_err().into_client_error().unwrap();
        assert_eq!(err.message, "Network Error");
        assert_eq!(err.code, None);
        assert!(err.response.is_none());
        assert!(err.transport.is_some());
        assert_eq!(err.kind(), ErrorKind::TransportFailure);
    }

    #[tokio::test]
    async fn timeout_is_coded_and_first_event_wins() {
        let (transport, executor) = setup();
        let pending = executor.execute(RequestConfig::new("/api").timeout(1500));
        assert_eq!(transport.state().timeout, Some(Duration::from_millis(1500)));

        transport.listener().timeout();
        transport.respond(200, "OK", "", "late");
        transport.listener().error();

        let err = pending.await.unwrap_err().into_client_error().unwrap();
        assert_eq!(err.message, "Timeout of 1500 ms exceeded");
        assert_eq!(err.code.as_deref(), Some(ECONNABORTED));
        assert_eq!(err.kind(), ErrorKind::Timeout);
    }

    #[tokio::test]
    async fn completion_then_timeout_keeps_completion() {
        let (transport, executor) = setup();
        let pending = executor.execute(RequestConfig::new("/api").timeout(10));
        transport.respond(201, "Created", "", "");
        transport.listener().timeout();
        assert_eq!(pending.await.unwrap().status, 201);
    }

    #[tokio::test]
    async fn zero_status_does_not_settle() {
        let (transport, executor) = setup();
        let mut pending = executor.execute(RequestConfig::new("/api"));
        transport.state().ready_state = ReadyState::Done;
        transport.listener().ready_state_changed();
        assert!(still_pending(&mut pending).await);

        transport.respond(200, "OK", "", "fine");
        assert_eq!(pending.await.unwrap().status, 200);
    }

    #[tokio::test]
    async fn intermediate_ready_states_do_not_settle() {
        let (transport, executor) = setup();
        let mut pending = executor.execute(RequestConfig::new("/api"));
        {
            let mut s = transport.state();
            s.status = 200;
            s.ready_state = ReadyState::HeadersReceived;
        }
        transport.listener().ready_state_changed();
        assert!(still_pending(&mut pending).await);
    }

    #[tokio::test]
    async fn cancel_before_any_event() {
        let (transport, executor) = setup();
        let source = CancelToken::source();
        let pending = executor.execute(RequestConfig::new("/api").cancel_token(source.token()));
        source.cancel("Operation canceled by the user.");
        transport.listener().error();

        let err = pending.await.unwrap_err();
        assert_eq!(
            err.cancel_reason(),
            Some(&Cancel::new("Operation canceled by the user."))
        );
        assert!(transport.state().aborted);
    }

    #[tokio::test]
    async fn already_cancelled_token_skips_send() {
        let (transport, executor) = setup();
        let source = CancelToken::source();
        source.cancel("too late");
        let pending = executor.execute(RequestConfig::new("/api").cancel_token(source.token()));

        assert!(pending.await.unwrap_err().is_cancel());
        assert!(transport.state().body.is_none());
        assert!(transport.state().aborted);
    }

    #[tokio::test]
    async fn cancel_after_completion_is_noop() {
        let (transport, executor) = setup();
        let source = CancelToken::source();
        let pending = executor.execute(RequestConfig::new("/api").cancel_token(source.token()));
        transport.respond(200, "OK", "", "done");
        source.cancel("ignored");

        assert_eq!(pending.await.unwrap().status, 200);
        assert!(!transport.state().aborted);
    }

    #[tokio::test]
    async fn settled_executions_release_their_cancel_subscription() {
        let token = CancelToken::source().token();
        for _ in 0..100 {
            let (transport, executor) = setup();
            let pending = executor.execute(RequestConfig::new("/api").cancel_token(token.clone()));
            assert_eq!(token.listener_count(), 1);
            transport.respond(200, "OK", "", "");
            assert_eq!(pending.await.unwrap().status, 200);
        }
        assert_eq!(token.listener_count(), 0);
    }

    #[tokio::test]
    async fn dropped_execution_releases_its_cancel_subscription() {
        let token = CancelToken::source().token();
        let (transport, executor) = setup();
        let pending = executor.execute(RequestConfig::new("/api").cancel_token(token.clone()));
        drop(transport.listener.lock().unwrap().take());

        assert_eq!(token.listener_count(), 0);
        assert!(pending.await.is_err());
    }

    #[tokio::test]
    async fn open_failure_rejects_without_sending() {
        let transport = Arc::new(ScriptedTransport {
            fail_open: true,
            ..ScriptedTransport::default()
        });
        let executor = executor_for(&transport);
        let err = executor
            .execute(RequestConfig::new("ftp://nope"))
            .await
            .unwrap_err()
            .into_client_error()
            .unwrap();
        assert!(err.message.contains("ftp://nope"));
        assert_eq!(err.kind(), ErrorKind::TransportFailure);
        assert!(transport.state().body.is_none());
    }

    #[tokio::test]
    async fn dropped_listener_rejects() {
        let (transport, executor) = setup();
        let pending = executor.execute(RequestConfig::new("/api"));
        drop(transport.listener.lock().unwrap().take());
        let err = pending.await.unwrap_err().into_client_error().unwrap();
        assert_eq!(err.message, "Request dropped before completion");
    }

    #[tokio::test]
    async fn configures_transport_and_headers() {
        let (transport, executor) = setup();
        let origin = Url::parse("http://localhost").unwrap();
        let executor = executor.with_environment(Environment::with_origin(
            origin,
            CookieHeader("XSRF-TOKEN=abc".to_string()),
        ));
        let config = RequestConfig::new("/api")
            .method(HttpMethod::Post)
            .data("payload")
            .header("Content-Type", "text/plain")
            .with_credentials(true)
            .xsrf("XSRF-TOKEN", "X-XSRF-TOKEN")
            .auth(BasicAuth::new("u", "p"));
        let _pending = executor.execute(config);

        let state = transport.state();
        assert_eq!(state.method, Some(HttpMethod::Post));
        assert!(state.with_credentials);
        assert_eq!(state.timeout, None);
        assert_eq!(state.response_type, None);
        assert_eq!(
            state.headers,
            vec![
                ("Content-Type".to_string(), "text/plain".to_string()),
                ("X-XSRF-TOKEN".to_string(), "abc".to_string()),
                ("Authorization".to_string(), "Basic dTpw".to_string()),
            ]
        );
        assert_eq!(state.body, Some(Some(RequestBody::Text("payload".to_string()))));
    }

    #[tokio::test]
    async fn progress_callbacks_stop_after_settlement() {
        let (transport, executor) = setup();
        let downloads = Arc::new(AtomicUsize::new(0));
        let uploads = Arc::new(AtomicUsize::new(0));
        let (d, u) = (downloads.clone(), uploads.clone());
        let config = RequestConfig::new("/api")
            .on_download_progress(move |e| {
                assert_eq!(e.total, Some(10));
                d.fetch_add(1, Ordering::SeqCst);
            })
            .on_upload_progress(move |_| {
                u.fetch_add(1, Ordering::SeqCst);
            });
        let pending = executor.execute(config);
        let listener = transport.listener();
        listener.upload_progress(ProgressEvent { loaded: 3, total: None });
        listener.download_progress(ProgressEvent { loaded: 5, total: Some(10) });
        transport.respond(200, "OK", "", "");
        listener.download_progress(ProgressEvent { loaded: 10, total: Some(10) });

        pending.await.unwrap();
        assert_eq!(downloads.load(Ordering::SeqCst), 1);
        assert_eq!(uploads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn each_execution_gets_a_fresh_transport() {
        let created = Arc::new(AtomicUsize::new(0));
        let count = created.clone();
        let executor = RequestExecutor::new(move || -> Arc<dyn Transport> {
            count.fetch_add(1, Ordering::SeqCst);
            Arc::new(ScriptedTransport::default())
        });
        let a = executor.execute(RequestConfig::new("/a"));
        let b = executor.execute(RequestConfig::new("/b"));
        assert_ne!(a.id(), b.id());
        assert_eq!(created.load(Ordering::SeqCst), 2);
    }

    async fn still_pending(pending: &mut PendingResponse) -> bool {
        tokio::time::timeout(Duration::from_millis(20), pending)
            .await
            .is_err()
    }
}
