//! Request matching rules
//!
//! Method and path select candidates; `requestMatch` then narrows them. Every
//! specified query parameter, header and body field must be present in the
//! request. Unspecified criteria match anything.

use crate::request::MockRequest;
use serde_json::Value;
use tb_core::{MockEndpoint, RequestMatch};

/// Whether `endpoint` accepts `request`
pub fn endpoint_matches(endpoint: &MockEndpoint, request: &MockRequest) -> bool {
    endpoint.method.as_str().eq_ignore_ascii_case(&request.method)
        && path_matches(&endpoint.path, &request.path)
        && endpoint
            .request_match
            .as_ref()
            .map_or(true, |rm| constraints_match(rm, request))
}

/// Compare a mock path with a request path.
///
/// A trailing slash is ignored. Pattern segments written `:name` or `{name}`
/// match any single non-empty segment; everything else compares exactly.
pub fn path_matches(pattern: &str, path: &str) -> bool {
    let pattern = trim_trailing_slash(pattern);
    let path = trim_trailing_slash(path);
    if pattern == path {
        return true;
    }

    let mut pattern_segments = pattern.split('/');
    let mut path_segments = path.split('/');
    loop {
        match (pattern_segments.next(), path_segments.next()) {
            (None, None) => return true,
            (Some(p), Some(s)) => {
                let matched = if is_wildcard(p) { !s.is_empty() } else { p == s };
                if !matched {
                    return false;
                }
            }
            _ => return false,
        }
    }
}

fn trim_trailing_slash(path: &str) -> &str {
    if path.len() > 1 {
        path.strip_suffix('/').unwrap_or(path)
    } else {
        path
    }
}

fn is_wildcard(segment: &str) -> bool {
    (segment.len() > 1 && segment.starts_with(':'))
        || (segment.len() > 2 && segment.starts_with('{') && segment.ends_with('}'))
}

fn constraints_match(rm: &RequestMatch, request: &MockRequest) -> bool {
    rm.query
        .iter()
        .all(|(k, v)| request.query.get(k) == Some(v))
        && rm
            .headers
            .iter()
            .all(|(k, v)| request.header(k) == Some(v.as_str()))
        && rm
            .body
            .as_ref()
            .map_or(true, |expected| body_contains(expected, &request.body))
}

/// Subset match: every key in an `expected` object must be present in
/// `actual` with a matching value, recursively. Arrays match element-wise
/// and must have the same length. Scalars compare by equality.
pub fn body_contains(expected: &Value, actual: &Value) -> bool {
    match (expected, actual) {
        (Value::Object(exp), Value::Object(act)) => exp
            .iter()
            .all(|(k, v)| act.get(k).is_some_and(|a| body_contains(v, a))),
        (Value::Array(exp), Value::Array(act)) => {
            exp.len() == act.len() && exp.iter().zip(act).all(|(e, a)| body_contains(e, a))
        }
        _ => expected == actual,
    }
}

#[cfg(test)]
#[path = "matcher_test.rs"]
mod tests;
