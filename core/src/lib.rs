//! Request-execution core of an HTTP client.
//!
//! # Overview
//! Takes a fully-resolved `RequestConfig`, drives one `Transport` exchange to
//! completion and settles exactly once with either a `Response` or a
//! `RequestError`. The transport itself is supplied by the host, which keeps
//! the core free of any particular networking stack.
//!
//! # Design
//! - `url_builder::build_url` serializes query parameters onto the request URL.
//! - `headers::process_headers` computes the headers actually sent (body-type,
//!   XSRF and Basic auth rules) without touching the caller's config.
//! - `executor::RequestExecutor` runs the exchange as a small state machine;
//!   completion, network error, timeout and cancellation race to settle it
//!   and only the first one counts.
//! - `client::Client` is a thin dispatch layer above the executor (base URL,
//!   JSON request/response handling).
//! - Cookie lookup and the current origin are injected through `Environment`.

pub mod cancel;
pub mod client;
pub mod cookie;
pub mod env;
pub mod error;
pub mod executor;
pub mod headers;
pub mod http;
pub mod transport;
pub mod types;
pub mod url_builder;
pub mod validate;

pub use cancel::{Cancel, CancelToken, CancelTokenSource, Subscription};
pub use client::Client;
pub use cookie::{CookieHeader, CookieStore, NoCookies};
pub use env::Environment;
pub use error::{create_error, ClientError, ErrorKind, RequestError, RequestResult, ECONNABORTED};
pub use executor::{PendingResponse, RequestExecutor};
pub use http::{FormData, HttpMethod, RequestBody, ResponseData, ResponseType};
pub use transport::{ReadyState, Transport, TransportError, TransportFactory, TransportListener};
pub use types::{BasicAuth, ParamValue, Params, ProgressEvent, RequestConfig, Response};
pub use url_builder::build_url;
pub use validate::validate_status;
