//! Cookie plumbing for the session and CSRF tokens.

use axum::http::{header, HeaderMap, HeaderValue};

pub const SESSION_COOKIE: &str = "_token";
pub const CSRF_COOKIE: &str = "_csrf";

pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(header::COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .find_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;
            (key == name).then(|| value.to_string())
        })
}

/// HttpOnly session cookie carrying the signed token.
pub fn session_cookie(token: &str, max_age_secs: i64) -> HeaderValue {
    let cookie = format!(
        "{SESSION_COOKIE}={token}; HttpOnly; SameSite=Lax; Path=/; Max-Age={max_age_secs}"
    );
    HeaderValue::from_str(&cookie).unwrap_or_else(|_| HeaderValue::from_static(""))
}

pub fn clear_session_cookie() -> HeaderValue {
    HeaderValue::from_static("_token=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0")
}

/// CSRF cookie is readable by the client so it can be echoed back in a header.
pub fn csrf_cookie(token: &str) -> HeaderValue {
    let cookie = format!("{CSRF_COOKIE}={token}; SameSite=Lax; Path=/");
    HeaderValue::from_str(&cookie).unwrap_or_else(|_| HeaderValue::from_static(""))
}
