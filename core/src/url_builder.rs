//! Query-string assembly and URL origin helpers.

use chrono::SecondsFormat;
use url::Url;

use crate::types::{ParamValue, Params};

/// Percent-encode a query key or value.
///
/// Starts from URI-component encoding, then puts back the characters that
/// read better literally in a query string. Space becomes `+`.
pub fn encode(value: &str) -> String {
    urlencoding::encode(value)
        .replace("%21", "!")
        .replace("%27", "'")
        .replace("%28", "(")
        .replace("%29", ")")
        .replace("%2A", "*")
        .replace("%40", "@")
        .replace("%3A", ":")
        .replace("%24", "$")
        .replace("%2C", ",")
        .replace("%20", "+")
        .replace("%5B", "[")
        .replace("%5D", "]")
}

/// Append `params` to `url` as a query string.
///
/// `Null` values are skipped. Arrays expand to one `key[]=value` pair per
/// element. A fragment on `url` is dropped once there is something to append.
pub fn build_url(url: &str, params: &Params) -> String {
    let mut parts = Vec::new();

    for (key, value) in params.iter() {
        match value {
            ParamValue::Null => continue,
            ParamValue::Array(items) => {
                let key = encode(&format!("{key}[]"));
                for item in items {
                    parts.push(format!("{key}={}", encode(&render(item))));
                }
            }
            other => parts.push(format!("{}={}", encode(key), encode(&render(other)))),
        }
    }

    if parts.is_empty() {
        return url.to_string();
    }

    let base = match url.find('#') {
        Some(idx) => &url[..idx],
        None => url,
    };
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{base}{separator}{}", parts.join("&"))
}

/// Text form of a single value before encoding.
fn render(value: &ParamValue) -> String {
    match value {
        ParamValue::Null => "null".to_string(),
        ParamValue::Bool(b) => b.to_string(),
        ParamValue::Number(n) => render_number(n),
        ParamValue::String(s) => s.clone(),
        ParamValue::Date(date) => date.to_rfc3339_opts(SecondsFormat::Millis, true),
        ParamValue::Object(map) => serde_json::Value::Object(map.clone()).to_string(),
        ParamValue::Array(items) => items.iter().map(render).collect::<Vec<_>>().join(","),
    }
}

/// Whole floats print without a trailing `.0`.
fn render_number(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => (f as i64).to_string(),
        _ => n.to_string(),
    }
}

/// `true` when `url` starts with a scheme (`http:`) or is protocol-relative (`//host`).
pub fn is_absolute_url(url: &str) -> bool {
    if url.starts_with("//") {
        return true;
    }
    match url.split_once("://") {
        Some((scheme, _)) => {
            let mut chars = scheme.chars();
            chars.next().is_some_and(|c| c.is_ascii_alphabetic())
                && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

/// Join a base URL and a relative path with exactly one `/` between them.
pub fn combine_urls(base_url: &str, relative_url: &str) -> String {
    if relative_url.is_empty() {
        return base_url.to_string();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        relative_url.trim_start_matches('/')
    )
}

/// Compare the scheme, host and port of `request_url` against `origin`.
///
/// `request_url` is resolved against `origin` first, so relative URLs are
/// same-origin. A URL that cannot be resolved at all is treated as
/// same-origin too.
pub fn is_same_origin(request_url: &str, origin: &Url) -> bool {
    match origin.join(request_url) {
        Ok(target) => {
            target.scheme() == origin.scheme()
                && target.host_str() == origin.host_str()
                && target.port_or_known_default() == origin.port_or_known_default()
        }
        Err(_) => true,
    }
}
