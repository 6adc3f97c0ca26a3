//! The boundary between the executor and the host's networking.
//!
//! # Design
//! A `Transport` performs exactly one HTTP exchange. The executor opens and
//! configures it, hands it the body together with a `TransportListener`, and
//! from then on only reacts to the events the transport reports. Response
//! state is read back through the accessor methods once the listener is told
//! the exchange is done.
//!
//! Methods take `&self`: transports report events from whatever thread runs
//! their I/O, so state lives behind interior mutability.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::http::{HttpMethod, RequestBody, ResponseData, ResponseType};
use crate::types::ProgressEvent;

/// Progress of an exchange as seen by the transport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReadyState {
    #[default]
    Unsent,
    Opened,
    HeadersReceived,
    Loading,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Events a transport reports during an exchange.
///
/// `ready_state_changed` may fire several times; only `ReadyState::Done`
/// with a non-zero status counts as completion. Calls after the exchange
/// has settled are ignored.
pub trait TransportListener: Send + Sync {
    fn ready_state_changed(&self);

    /// Low-level failure: nothing usable came back.
    fn error(&self);

    /// The configured timeout elapsed.
    fn timeout(&self);

    fn download_progress(&self, event: ProgressEvent);

    fn upload_progress(&self, event: ProgressEvent);
}

/// One HTTP exchange against the host's networking.
pub trait Transport: Send + Sync + fmt::Debug {
    fn open(&self, method: HttpMethod, url: &str) -> Result<(), TransportError>;

    fn set_response_type(&self, response_type: ResponseType);

    fn set_timeout(&self, timeout: Duration);

    fn set_with_credentials(&self, with_credentials: bool);

    fn set_request_header(&self, name: &str, value: &str);

    /// Start the exchange. Outcomes are reported through `listener`.
    ///
    /// A cancel may land between the executor's last check and this call, so
    /// `send` after `abort` must be a no-op and must not reach the network.
    fn send(&self, body: Option<RequestBody>, listener: Arc<dyn TransportListener>);

    /// Stop the exchange. Must not report further events.
    fn abort(&self);

    fn ready_state(&self) -> ReadyState;

    /// 0 until a status line has been received.
    fn status(&self) -> u16;

    fn status_text(&self) -> String;

    /// Raw `Name: value\r\n` block of the received headers.
    fn response_headers(&self) -> String;

    fn response_text(&self) -> String;

    /// Body decoded according to the configured `ResponseType`.
    fn response(&self) -> ResponseData;
}

/// Creates a fresh transport for every execution.
pub trait TransportFactory: Send + Sync {
    fn create(&self) -> Arc<dyn Transport>;
}

impl<F> TransportFactory for F
where
    F: Fn() -> Arc<dyn Transport> + Send + Sync,
{
    fn create(&self) -> Arc<dyn Transport> {
        self()
    }
}
