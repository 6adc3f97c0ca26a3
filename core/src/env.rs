//! Capabilities the executor borrows from its host.
//!
//! A browser host has a current origin and a cookie jar; a server host
//! usually has neither. Both are injected here instead of being looked up
//! globally.

use std::fmt;
use std::sync::Arc;

use url::Url;

use crate::cookie::{CookieStore, NoCookies};
use crate::url_builder::is_same_origin;

type SameOriginCheck = Arc<dyn Fn(&str) -> bool + Send + Sync>;

#[derive(Clone)]
pub struct Environment {
    cookies: Arc<dyn CookieStore>,
    same_origin: SameOriginCheck,
}

impl Environment {
    pub fn new<C, F>(cookies: C, same_origin: F) -> Self
    where
        C: CookieStore + 'static,
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self {
            cookies: Arc::new(cookies),
            same_origin: Arc::new(same_origin),
        }
    }

    /// Environment for a page served from `origin`.
    pub fn with_origin<C>(origin: Url, cookies: C) -> Self
    where
        C: CookieStore + 'static,
    {
        Self::new(cookies, move |url| is_same_origin(url, &origin))
    }

    pub fn read_cookie(&self, name: &str) -> Option<String> {
        self.cookies.read(name)
    }

    pub fn is_same_origin(&self, url: &str) -> bool {
        (self.same_origin)(url)
    }
}

impl Default for Environment {
    /// No cookies and no current origin: only relative URLs count as
    /// same-origin.
    fn default() -> Self {
        Self::new(NoCookies, |url| Url::parse(url).is_err())
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment").finish_non_exhaustive()
    }
}
