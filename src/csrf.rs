//! Double-submit CSRF protection.
//!
//! Safe requests get a `_csrf` cookie (minted on first sight) and the token is
//! stashed in request extensions so form handlers can echo it. Mutating
//! requests must send the same value back in `X-CSRF-Token`; a missing or
//! mismatched header is rejected before any handler runs.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::{auth::tokens::one_shot_token, cookies};

pub const CSRF_HEADER: &str = "x-csrf-token";

/// Token made available to handlers through request extensions.
#[derive(Debug, Clone)]
pub struct CsrfToken(pub String);

pub async fn csrf_layer(mut req: Request<Body>, next: Next) -> Result<Response, Response> {
    let cookie = cookies::extract_cookie(req.headers(), cookies::CSRF_COOKIE);

    if req.method().is_safe() {
        let (token, fresh) = match cookie {
            Some(t) => (t, false),
            None => (one_shot_token(), true),
        };
        req.extensions_mut().insert(CsrfToken(token.clone()));
        let mut res = next.run(req).await;
        if fresh {
            res.headers_mut()
                .append(header::SET_COOKIE, cookies::csrf_cookie(&token));
        }
        return Ok(res);
    }

    let header_token = req
        .headers()
        .get(CSRF_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    match (cookie, header_token) {
        (Some(c), Some(h)) if !c.is_empty() && c == h => {
            req.extensions_mut().insert(CsrfToken(c));
            Ok(next.run(req).await)
        }
        _ => {
            warn!(method = %req.method(), uri = %req.uri(), "csrf token missing or mismatched");
            Err((StatusCode::FORBIDDEN, "CSRF token invalido").into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::Method,
        middleware,
        routing::{get, post},
        Router,
    };
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/form", get(|| async { "form" }))
            .route("/submit", post(|| async { "ok" }))
            .layer(middleware::from_fn(csrf_layer))
    }

    #[tokio::test]
    async fn get_issues_csrf_cookie() {
        let res = app()
            .oneshot(
                Request::builder()
                    .method(Method::GET)
                    .uri("/form")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let cookie = res
            .headers()
            .get(header::SET_COOKIE)
            .expect("csrf cookie should be set")
            .to_str()
            .unwrap();
        assert!(cookie.starts_with("_csrf="));
    }

    #[tokio::test]
    async fn post_without_token_is_rejected() {
        let res = app()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/submit")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn post_with_mismatched_token_is_rejected() {
        let res = app()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/submit")
                    .header(header::COOKIE, "_csrf=abc")
                    .header("x-csrf-token", "other")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn post_with_matching_token_passes() {
        let res = app()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/submit")
                    .header(header::COOKIE, "_csrf=abc")
                    .header("x-csrf-token", "abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }
}
