//! Dynamic constant resolution
//!
//! Scenario authors write `$`-prefixed placeholders (`$UUID`, `$SEQ`, ...) in
//! seed rows, mock responses and outbound headers. Resolution replaces each
//! placeholder with a freshly generated value.
//!
//! Generation is scoped to a single string: every occurrence of a token inside
//! one string receives the same value, while two different strings get
//! independent values. The resolver keeps no state between calls.

use crate::scenario::{Row, TargetApi};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Fixed prefix of `$SEQ` values
pub const SEQ_PREFIX: &str = "SEQ";

/// Length of a `$RANDOM_STRING` value
pub const RANDOM_STRING_LEN: usize = 8;

const ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// The closed set of supported placeholder tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstantToken {
    Seq,
    Timestamp,
    UnixTimestamp,
    Uuid,
    RandomString,
}

impl ConstantToken {
    /// Every token, in resolution order
    pub const ALL: [ConstantToken; 5] = [
        ConstantToken::Seq,
        ConstantToken::Timestamp,
        ConstantToken::UnixTimestamp,
        ConstantToken::Uuid,
        ConstantToken::RandomString,
    ];

    /// The literal placeholder as written by scenario authors
    pub fn as_str(&self) -> &'static str {
        match self {
            ConstantToken::Seq => "$SEQ",
            ConstantToken::Timestamp => "$TIMESTAMP",
            ConstantToken::UnixTimestamp => "$UNIX_TIMESTAMP",
            ConstantToken::Uuid => "$UUID",
            ConstantToken::RandomString => "$RANDOM_STRING",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ConstantToken::Seq => "'SEQ' followed by the current epoch milliseconds, zero-padded to 13 digits",
            ConstantToken::Timestamp => "current time as ISO-8601 (e.g. 2024-01-31T12:00:00.000Z)",
            ConstantToken::UnixTimestamp => "current time in milliseconds since the Unix epoch",
            ConstantToken::Uuid => "random UUID (v4)",
            ConstantToken::RandomString => "random 8-character alphanumeric string",
        }
    }

    /// Produce a fresh value for this token
    pub fn generate(&self) -> String {
        self.generate_at(Utc::now())
    }

    /// Produce a value, using `now` for the time-derived tokens
    pub fn generate_at(&self, now: DateTime<Utc>) -> String {
        match self {
            ConstantToken::Seq => {
                format!("{}{:013}", SEQ_PREFIX, now.timestamp_millis().max(0))
            }
            ConstantToken::Timestamp => now.to_rfc3339_opts(SecondsFormat::Millis, true),
            ConstantToken::UnixTimestamp => now.timestamp_millis().to_string(),
            ConstantToken::Uuid => Uuid::new_v4().to_string(),
            ConstantToken::RandomString => random_alphanumeric(RANDOM_STRING_LEN),
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    /// Match a token at the very start of `text`.
    ///
    /// The character after the token must not continue an identifier, so
    /// `$SEQUENCE` is not read as `$SEQ` followed by `UENCE`.
    fn match_prefix(text: &str) -> Option<ConstantToken> {
        ConstantToken::ALL.into_iter().find(|token| {
            let literal = token.as_str();
            text.starts_with(literal)
                && !text[literal.len()..]
                    .chars()
                    .next()
                    .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        })
    }
}

impl fmt::Display for ConstantToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// All tokens understood by [`ConstantResolver`]
pub fn supported_tokens() -> &'static [ConstantToken] {
    &ConstantToken::ALL
}

/// Random alphanumeric string drawn from v4 UUID entropy
fn random_alphanumeric(len: usize) -> String {
    let mut out = String::with_capacity(len);
    while out.len() < len {
        let uuid = Uuid::new_v4();
        // bytes 6 and 8 carry the version and variant bits
        for (i, byte) in uuid.as_bytes().iter().enumerate() {
            if i == 6 || i == 8 || *byte >= 248 {
                continue;
            }
            out.push(ALPHANUMERIC[(*byte % 62) as usize] as char);
            if out.len() == len {
                break;
            }
        }
    }
    out
}

/// Stateless placeholder resolver.
///
/// Walks strings, arrays and objects (object keys are left untouched);
/// numbers, booleans and null pass through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantResolver;

impl ConstantResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolve every placeholder inside `value`, returning a new value
    pub fn resolve(&self, value: &Value) -> Value {
        let mut out = value.clone();
        self.resolve_in_place(&mut out);
        out
    }

    /// Resolve every placeholder inside `value` in place
    pub fn resolve_in_place(&self, value: &mut Value) {
        match value {
            Value::String(s) => {
                if let Some(resolved) = self.try_resolve_str(s) {
                    *s = resolved;
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.resolve_in_place(item);
                }
            }
            Value::Object(map) => {
                for v in map.values_mut() {
                    self.resolve_in_place(v);
                }
            }
            Value::Null | Value::Bool(_) | Value::Number(_) => {}
        }
    }

    /// Resolve the placeholders of one string
    pub fn resolve_str(&self, input: &str) -> String {
        self.try_resolve_str(input)
            .unwrap_or_else(|| input.to_string())
    }

    /// Resolve one seed row; each field is an independent string scope
    pub fn resolve_row(&self, row: &Row) -> Row {
        row.iter()
            .map(|(k, v)| (k.clone(), self.resolve(v)))
            .collect()
    }

    /// Resolve header values; header names are left untouched
    pub fn resolve_headers(&self, headers: &BTreeMap<String, String>) -> BTreeMap<String, String> {
        headers
            .iter()
            .map(|(k, v)| (k.clone(), self.resolve_str(v)))
            .collect()
    }

    /// A copy of `target` with headers and body resolved, ready to send
    pub fn resolve_target(&self, target: &TargetApi) -> TargetApi {
        TargetApi {
            headers: self.resolve_headers(&target.headers),
            body: target.body.as_ref().map(|b| self.resolve(b)),
            ..target.clone()
        }
    }

    /// `None` when the string holds no recognized token
    fn try_resolve_str(&self, input: &str) -> Option<String> {
        if !input.contains('$') {
            return None;
        }

        let mut generated: [Option<String>; 5] = Default::default();
        let mut replaced = false;
        let mut out = String::with_capacity(input.len());
        let mut rest = input;

        while let Some(pos) = rest.find('$') {
            out.push_str(&rest[..pos]);
            let candidate = &rest[pos..];
            match ConstantToken::match_prefix(candidate) {
                Some(token) => {
                    let value = generated[token.index()].get_or_insert_with(|| token.generate());
                    out.push_str(value);
                    rest = &candidate[token.as_str().len()..];
                    replaced = true;
                }
                None => {
                    out.push('$');
                    rest = &candidate[1..];
                }
            }
        }
        out.push_str(rest);

        replaced.then_some(out)
    }
}

#[cfg(test)]
#[path = "constants_test.rs"]
mod tests;
