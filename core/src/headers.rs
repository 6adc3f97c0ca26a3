//! Request header computation and response header parsing.
//!
//! # Design
//! `process_headers` never edits the caller's header list. It returns the
//! list that should be committed to the transport, in order: body-type rule,
//! XSRF token, Basic auth, then the final no-body filter.

use std::collections::HashMap;

use base64::Engine as _;

use crate::env::Environment;
use crate::http::RequestBody;
use crate::types::RequestConfig;

const CONTENT_TYPE: &str = "Content-Type";
const JSON_CONTENT_TYPE: &str = "application/json;charset=utf-8";

/// Replace every header named `name` (any casing) with a single entry.
pub fn set_header(headers: &mut Vec<(String, String)>, name: &str, value: String) {
    match headers.iter().position(|(k, _)| k.eq_ignore_ascii_case(name)) {
        Some(idx) => {
            headers[idx] = (name.to_string(), value);
            let mut i = idx + 1;
            while i < headers.len() {
                if headers[i].0.eq_ignore_ascii_case(name) {
                    headers.remove(i);
                } else {
                    i += 1;
                }
            }
        }
        None => headers.push((name.to_string(), value)),
    }
}

pub fn remove_header(headers: &mut Vec<(String, String)>, name: &str) {
    headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
}

pub fn has_header(headers: &[(String, String)], name: &str) -> bool {
    headers.iter().any(|(k, _)| k.eq_ignore_ascii_case(name))
}

/// Compute the headers to send for `config`.
///
/// `url` is the final request URL (query included) used for the same-origin
/// check.
pub fn process_headers(config: &RequestConfig, url: &str, env: &Environment) -> Vec<(String, String)> {
    let mut headers = config.headers.clone();

    if config.data.as_ref().is_some_and(RequestBody::is_form_data) {
        remove_header(&mut headers, CONTENT_TYPE);
    }

    if config.with_credentials || env.is_same_origin(url) {
        if let Some(cookie_name) = &config.xsrf_cookie_name {
            let token = env.read_cookie(cookie_name).filter(|v| !v.is_empty());
            if let (Some(token), Some(header_name)) = (token, &config.xsrf_header_name) {
                set_header(&mut headers, header_name, token);
            }
        }
    }

    if let Some(auth) = &config.auth {
        let credentials = format!("{}:{}", auth.username, auth.password);
        let encoded = base64::engine::general_purpose::STANDARD.encode(credentials);
        set_header(&mut headers, "Authorization", format!("Basic {encoded}"));
    }

    if config.data.is_none() {
        remove_header(&mut headers, CONTENT_TYPE);
    }

    headers
}

/// Rename headers matching `normalized_name` case-insensitively to that exact spelling.
pub fn normalize_header_name(headers: &mut [(String, String)], normalized_name: &str) {
    for (name, _) in headers.iter_mut() {
        if name != normalized_name && name.eq_ignore_ascii_case(normalized_name) {
            *name = normalized_name.to_string();
        }
    }
}

/// JSON bodies get a JSON content type unless one is already set.
pub fn apply_default_content_type(headers: &mut Vec<(String, String)>, data: Option<&RequestBody>) {
    normalize_header_name(headers, CONTENT_TYPE);
    if matches!(data, Some(RequestBody::Json(_))) && !has_header(headers, CONTENT_TYPE) {
        headers.push((CONTENT_TYPE.to_string(), JSON_CONTENT_TYPE.to_string()));
    }
}

/// Parse a raw `Name: value\r\n` header block into a lower-cased map.
///
/// Lines without a name are skipped; later duplicates win.
pub fn parse_headers(raw: &str) -> HashMap<String, String> {
    let mut parsed = HashMap::new();
    for line in raw.split("\r\n").flat_map(|l| l.split('\n')) {
        let (key, value) = match line.split_once(':') {
            Some((key, value)) => (key, value),
            None => (line, ""),
        };
        let key = key.trim().to_ascii_lowercase();
        if key.is_empty() {
            continue;
        }
        parsed.insert(key, value.trim().to_string());
    }
    parsed
}
