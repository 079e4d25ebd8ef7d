// src/logging_middleware.rs
//! Middleware for logging request and response bodies in debug mode

use axum::body::to_bytes;
use axum::{
    body::Body,
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use serde_json::Value;
use tracing::{debug, enabled, Level};

use crate::common::safe_token_log;

/// Query parameters and JSON keys whose values never reach the log.
const SENSITIVE_KEYS: [&str; 4] = ["token", "code", "state", "secret"];

fn is_sensitive(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    SENSITIVE_KEYS.iter().any(|s| key.contains(s))
}

/// Replaces every sensitive string value in a JSON document.
fn mask_json(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, inner) in map.iter_mut() {
                match inner {
                    Value::String(s) if is_sensitive(key) => *s = safe_token_log(s),
                    _ => mask_json(inner),
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(mask_json),
        _ => {}
    }
}

/// Masks sensitive query parameter values in a URI or redirect target.
fn mask_query(uri: &str) -> String {
    let Some((path, query)) = uri.split_once('?') else {
        return uri.to_string();
    };

    let masked: Vec<String> = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) if is_sensitive(key) => format!("{}={}", key, safe_token_log(value)),
            _ => pair.to_string(),
        })
        .collect();

    format!("{}?{}", path, masked.join("&"))
}

fn describe_body(bytes: &[u8]) -> Option<String> {
    if bytes.is_empty() {
        return None;
    }
    let body_str = std::str::from_utf8(bytes).ok()?;
    match serde_json::from_str::<Value>(body_str) {
        Ok(mut json) => {
            mask_json(&mut json);
            Some(serde_json::to_string_pretty(&json).unwrap_or_else(|_| json.to_string()))
        }
        Err(_) => Some(body_str.to_string()),
    }
}

/// Middleware to log request and response bodies in debug mode
pub async fn log_request_response(request: Request, next: Next) -> Result<Response, StatusCode> {
    if !enabled!(Level::DEBUG) {
        return Ok(next.run(request).await);
    }

    let (parts, body) = request.into_parts();
    let uri = mask_query(&parts.uri.to_string());

    let bytes = to_bytes(body, usize::MAX)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    match describe_body(&bytes) {
        Some(request_body) => debug!(
            method = %parts.method,
            uri = %uri,
            request_body = %request_body,
            "📥 Request"
        ),
        None => debug!(method = %parts.method, uri = %uri, "📥 Request"),
    }

    let request = Request::from_parts(parts, Body::from(bytes));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let bytes = to_bytes(body, usize::MAX)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if let Some(location) = parts
        .headers
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
    {
        debug!(status = %parts.status, location = %mask_query(location), "📤 Redirect");
    } else if let Some(response_body) = describe_body(&bytes) {
        debug!(status = %parts.status, response_body = %response_body, "📤 Response");
    }

    Ok(Response::from_parts(parts, Body::from(bytes)))
}
