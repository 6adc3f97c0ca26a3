//! Error types for request execution.
//!
//! # Design
//! Every failure the executor produces itself is a `ClientError`. Callers
//! tell the cases apart by `code` (set only for timeouts) and `response`
//! (set only when a complete response failed status validation). A
//! cancellation is not a client failure: its reason is handed back as given,
//! wrapped only in `RequestError::Cancelled`.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::cancel::Cancel;
use crate::transport::Transport;
use crate::types::{RequestConfig, Response};

/// Code attached to timeout errors.
pub const ECONNABORTED: &str = "ECONNABORTED";

#[derive(Error)]
#[error("{message}")]
pub struct ClientError {
    pub message: String,
    pub config: Arc<RequestConfig>,
    pub code: Option<String>,
    pub transport: Option<Arc<dyn Transport>>,
    pub response: Option<Box<Response>>,
}

/// Which of the executor's failure modes produced a `ClientError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No usable response: connectivity failure, or the transport gave up.
    TransportFailure,
    /// The configured timeout elapsed.
    Timeout,
    /// A complete response whose status was not accepted.
    RejectedStatus,
}

impl ClientError {
    /// Always `true`; lets generic error handling recognise errors raised by
    /// this crate after they have been boxed.
    pub fn is_client_error(&self) -> bool {
        true
    }

    pub fn kind(&self) -> ErrorKind {
        if self.response.is_some() {
            ErrorKind::RejectedStatus
        } else if self.code.as_deref() == Some(ECONNABORTED) {
            ErrorKind::Timeout
        } else {
            ErrorKind::TransportFailure
        }
    }

    pub fn status(&self) -> Option<u16> {
        self.response.as_ref().map(|r| r.status)
    }
}

impl fmt::Debug for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientError")
            .field("message", &self.message)
            .field("code", &self.code)
            .field("url", &self.config.url)
            .field("method", &self.config.method)
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}

/// Build a `ClientError`. No I/O.
pub fn create_error(
    message: impl Into<String>,
    config: Arc<RequestConfig>,
    code: Option<&str>,
    transport: Option<Arc<dyn Transport>>,
    response: Option<Response>,
) -> ClientError {
    ClientError {
        message: message.into(),
        config,
        code: code.map(str::to_string),
        transport,
        response: response.map(Box::new),
    }
}

/// The rejection outcome of one execution.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("{0}")]
    Cancelled(Cancel),
}

impl RequestError {
    pub fn is_cancel(&self) -> bool {
        matches!(self, RequestError::Cancelled(_))
    }

    pub fn as_client_error(&self) -> Option<&ClientError> {
        match self {
            RequestError::Client(err) => Some(err),
            RequestError::Cancelled(_) => None,
        }
    }

    pub fn into_client_error(self) -> Option<ClientError> {
        match self {
            RequestError::Client(err) => Some(err),
            RequestError::Cancelled(_) => None,
        }
    }

    pub fn cancel_reason(&self) -> Option<&Cancel> {
        match self {
            RequestError::Cancelled(reason) => Some(reason),
            RequestError::Client(_) => None,
        }
    }
}

impl From<Cancel> for RequestError {
    fn from(reason: Cancel) -> Self {
        RequestError::Cancelled(reason)
    }
}

pub type RequestResult<T = Response> = Result<T, RequestError>;
