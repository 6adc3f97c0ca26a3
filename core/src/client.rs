//! Request dispatch on top of the executor.
//!
//! # Design
//! `Client` holds a base URL and a `RequestExecutor` and carries no mutable
//! state between calls. Each call resolves the URL against the base, fills in
//! the XSRF defaults and a JSON content type, runs the request through the
//! executor, then turns JSON text bodies into JSON values. Everything that
//! decides how a single exchange settles lives in the executor.

use crate::env::Environment;
use crate::error::{RequestError, RequestResult};
use crate::executor::RequestExecutor;
use crate::headers::apply_default_content_type;
use crate::http::{HttpMethod, RequestBody, ResponseData};
use crate::transport::TransportFactory;
use crate::types::{RequestConfig, Response};
use crate::url_builder::{combine_urls, is_absolute_url};

pub const DEFAULT_XSRF_COOKIE_NAME: &str = "XSRF-TOKEN";
pub const DEFAULT_XSRF_HEADER_NAME: &str = "X-XSRF-TOKEN";

/// Asynchronous client bound to an optional base URL.
#[derive(Clone)]
pub struct Client {
    base_url: Option<String>,
    executor: RequestExecutor,
}

impl Client {
    pub fn new<F>(base_url: &str, factory: F) -> Self
    where
        F: TransportFactory + 'static,
    {
        let base_url = base_url.trim_end_matches('/');
        Self {
            base_url: (!base_url.is_empty()).then(|| base_url.to_string()),
            executor: RequestExecutor::new(factory),
        }
    }

    pub fn with_environment(mut self, env: Environment) -> Self {
        self.executor = self.executor.with_environment(env);
        self
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// The config the executor will receive for `config`.
    pub fn prepare(&self, mut config: RequestConfig) -> RequestConfig {
        if let Some(base_url) = &self.base_url {
            if !is_absolute_url(&config.url) {
                config.url = combine_urls(base_url, &config.url);
            }
        }
        if config.xsrf_cookie_name.is_none() {
            config.xsrf_cookie_name = Some(DEFAULT_XSRF_COOKIE_NAME.to_string());
        }
        if config.xsrf_header_name.is_none() {
            config.xsrf_header_name = Some(DEFAULT_XSRF_HEADER_NAME.to_string());
        }
        apply_default_content_type(&mut config.headers, config.data.as_ref());
        config
    }

    pub async fn request(&self, config: RequestConfig) -> RequestResult<Response> {
        if let Some(token) = &config.cancel_token {
            token.throw_if_requested()?;
        }
        let config = self.prepare(config);
        match self.executor.execute(config).await {
            Ok(response) => Ok(transform_response(response)),
            Err(RequestError::Client(mut err)) => {
                if let Some(response) = err.response.take() {
                    err.response = Some(Box::new(transform_response(*response)));
                }
                Err(RequestError::Client(err))
            }
            Err(cancelled) => Err(cancelled),
        }
    }

    pub async fn get(&self, url: &str) -> RequestResult<Response> {
        self.request(RequestConfig::new(url)).await
    }

    pub async fn delete(&self, url: &str) -> RequestResult<Response> {
        self.request(RequestConfig::new(url).method(HttpMethod::Delete))
            .await
    }

    pub async fn head(&self, url: &str) -> RequestResult<Response> {
        self.request(RequestConfig::new(url).method(HttpMethod::Head))
            .await
    }

    pub async fn options(&self, url: &str) -> RequestResult<Response> {
        self.request(RequestConfig::new(url).method(HttpMethod::Options))
            .await
    }

    pub async fn post(&self, url: &str, data: impl Into<RequestBody>) -> RequestResult<Response> {
        self.request(RequestConfig::new(url).method(HttpMethod::Post).data(data))
            .await
    }

    pub async fn put(&self, url: &str, data: impl Into<RequestBody>) -> RequestResult<Response> {
        self.request(RequestConfig::new(url).method(HttpMethod::Put).data(data))
            .await
    }

    pub async fn patch(&self, url: &str, data: impl Into<RequestBody>) -> RequestResult<Response> {
        self.request(RequestConfig::new(url).method(HttpMethod::Patch).data(data))
            .await
    }
}

/// Text bodies that hold JSON become JSON values; anything else is kept.
fn transform_response(mut response: Response) -> Response {
    if let ResponseData::Text(text) = &response.data {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(text) {
            response.data = ResponseData::Json(value);
        }
    }
    response
}
