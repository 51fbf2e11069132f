// Browser clients call the API cross-origin, so every response (including
// errors and preflights) carries the same permissive CORS headers.

use http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue,
};

static CORS_HEADERS: &[(HeaderName, &str)] = &[
    (ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
    (ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, DELETE, OPTIONS"),
    (ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
];

/// Inserts the CORS headers, replacing any existing values.
pub fn add_cors_headers(headers: &mut HeaderMap) -> &mut HeaderMap {
    for (name, value) in CORS_HEADERS {
        headers.insert(name.clone(), HeaderValue::from_static(*value));
    }
    headers
}

pub fn add_json_content_type(headers: &mut HeaderMap) -> &mut HeaderMap {
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}
