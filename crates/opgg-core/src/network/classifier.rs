//! Response classification.
//!
//! Every upstream response passes through [`classify`] exactly once. The
//! result is either decoded JSON or one of the classified [`OpggError`]
//! variants. No retries happen here.

use super::client::RawResponse;
use crate::error::{truncate_body, OpggError, Result, MAX_DECODE_BODY_CHARS, MAX_ERROR_BODY_CHARS};
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use serde_json::Value;

/// Per-call classification options.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassifyOptions<'a> {
    /// Top-level keys a successful body must contain.
    pub required_keys: &'a [&'a str],
    /// Treat 404 as a legitimate negative answer instead of an error.
    pub absence_is_valid: bool,
}

impl<'a> ClassifyOptions<'a> {
    pub fn require(keys: &'a [&'a str]) -> Self {
        Self {
            required_keys: keys,
            absence_is_valid: false,
        }
    }

    pub fn allow_absent(mut self) -> Self {
        self.absence_is_valid = true;
        self
    }
}

/// Map a raw response to decoded JSON or a classified error.
///
/// Returns `Ok(None)` only for a 404 when `absence_is_valid` is set.
pub fn classify(response: &RawResponse, options: &ClassifyOptions<'_>) -> Result<Option<Value>> {
    let url = response.url.clone();
    let status = response.status;

    match status {
        200..=299 => decode_success(response, options).map(Some),
        404 if options.absence_is_valid => Ok(None),
        404 => Err(OpggError::NotFound {
            url,
            body: error_excerpt(response),
        }),
        429 => Err(OpggError::RateLimited {
            url,
            retry_after_secs: parse_retry_after(&response.headers, Utc::now()),
            body: error_excerpt(response),
        }),
        500..=599 => Err(OpggError::ServerFault {
            status,
            url,
            body: error_excerpt(response),
        }),
        // 4xx plus any 1xx/3xx that reached us undecoded.
        _ => Err(OpggError::ClientFault {
            status,
            url,
            body: error_excerpt(response),
        }),
    }
}

fn decode_success(response: &RawResponse, options: &ClassifyOptions<'_>) -> Result<Value> {
    let value: Value = serde_json::from_slice(&response.body).map_err(|e| OpggError::Decode {
        url: response.url.clone(),
        message: e.to_string(),
        raw_body: Some(truncate_body(&response.text(), MAX_DECODE_BODY_CHARS)),
    })?;

    if options.required_keys.is_empty() {
        return Ok(value);
    }

    let Some(object) = value.as_object() else {
        return Err(OpggError::ShapeMismatch {
            url: response.url.clone(),
            expected: format!("object with keys {:?}", options.required_keys),
            got: json_kind(&value).to_string(),
        });
    };

    let missing: Vec<&str> = options
        .required_keys
        .iter()
        .copied()
        .filter(|key| !object.contains_key(*key))
        .collect();

    if !missing.is_empty() {
        let mut present: Vec<&str> = object.keys().map(String::as_str).collect();
        present.sort_unstable();
        return Err(OpggError::ShapeMismatch {
            url: response.url.clone(),
            expected: format!("keys {:?}", missing),
            got: format!("keys {:?}", present),
        });
    }

    Ok(value)
}

fn error_excerpt(response: &RawResponse) -> Option<String> {
    if response.body.is_empty() {
        None
    } else {
        Some(truncate_body(&response.text(), MAX_ERROR_BODY_CHARS))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Parse a `Retry-After` header as delta-seconds or an HTTP-date.
///
/// Dates in the past yield zero.
pub fn parse_retry_after(headers: &HeaderMap, now: DateTime<Utc>) -> Option<u64> {
    let raw = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();

    if let Ok(secs) = raw.parse::<u64>() {
        return Some(secs);
    }

    let when = DateTime::parse_from_rfc2822(raw).ok()?;
    let delta = when.with_timezone(&Utc) - now;
    Some(delta.num_seconds().max(0) as u64)
}
