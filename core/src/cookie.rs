//! Read-only cookie lookup used for XSRF token retrieval.

use std::collections::HashMap;

/// Lookup of a cookie value by name. Implementations must be safe to call
/// from concurrent executions.
pub trait CookieStore: Send + Sync {
    fn read(&self, name: &str) -> Option<String>;
}

/// A store with no cookies.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCookies;

impl CookieStore for NoCookies {
    fn read(&self, _name: &str) -> Option<String> {
        None
    }
}

impl CookieStore for HashMap<String, String> {
    fn read(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Cookies held as a `name=value; name2=value2` string, the shape of a
/// `Cookie` request header.
#[derive(Debug, Clone, Default)]
pub struct CookieHeader(pub String);

impl CookieStore for CookieHeader {
    fn read(&self, name: &str) -> Option<String> {
        self.0
            .split(';')
            .filter_map(|pair| pair.trim_start().split_once('='))
            .find(|(key, _)| *key == name)
            .map(|(_, value)| match urlencoding::decode(value) {
                Ok(decoded) => decoded.into_owned(),
                Err(_) => value.to_string(),
            })
    }
}
