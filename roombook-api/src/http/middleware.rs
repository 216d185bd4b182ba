// HTTP middleware

use axum::{
    extract::{ConnectInfo, FromRef, FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use once_cell::sync::Lazy;
use roombook_core::service::{auth::Claims, RateLimitError};
use std::net::SocketAddr;

use super::{AppError, AppState, SecurityPolicy};

/// Pre-validated security header names (validated once at startup via Lazy)
static X_FRAME_OPTIONS: Lazy<header::HeaderName> = Lazy::new(|| header::HeaderName::from_static("x-frame-options"));
static X_CONTENT_TYPE_OPTIONS: Lazy<header::HeaderName> =
    Lazy::new(|| header::HeaderName::from_static("x-content-type-options"));
static CONTENT_SECURITY_POLICY: Lazy<header::HeaderName> =
    Lazy::new(|| header::HeaderName::from_static("content-security-policy"));
static REFERRER_POLICY: Lazy<header::HeaderName> = Lazy::new(|| header::HeaderName::from_static("referrer-policy"));
static PERMISSIONS_POLICY: Lazy<header::HeaderName> =
    Lazy::new(|| header::HeaderName::from_static("permissions-policy"));
static X_RATELIMIT_LIMIT: Lazy<header::HeaderName> =
    Lazy::new(|| header::HeaderName::from_static("x-ratelimit-limit"));

/// Authenticated user extracted from an access token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub claims: Claims,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let validator = &app_state.token_validator;

        // The Authorization header wins; the cookie is only consulted without one
        let validated = if let Some(auth_header) = parts.headers.get(header::AUTHORIZATION) {
            let auth_str = auth_header
                .to_str()
                .map_err(|e| AppError::unauthorized(format!("Invalid Authorization header: {e}")))?;
            validator.validate_http(auth_str)
        } else {
            let token = parts
                .headers
                .get_all(header::COOKIE)
                .iter()
                .filter_map(|value| value.to_str().ok())
                .find_map(|cookies| validator.token_from_cookies(cookies))
                .ok_or_else(|| AppError::unauthorized("Missing Authorization header"))?;
            validator.validate_token(token)
        };
        let claims = validated.map_err(|e| AppError::unauthorized(format!("{e}")))?;

        let user_id = claims
            .user_id()
            .map_err(|e| AppError::unauthorized(format!("{e}")))?;

        Ok(Self { user_id, claims })
    }
}

/// Authenticated user holding the admin role
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.claims.is_admin() {
            return Err(AppError::forbidden("Admin role required"));
        }
        Ok(Self(user))
    }
}

/// Per-client rate limiting, keyed by the socket address.
///
/// Proxy headers are not trusted. Without connect info every request shares
/// the `unknown` bucket.
pub async fn rate_limit_middleware(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let key = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or_else(|| "unknown".to_string(), |ci| ci.0.ip().to_string());

    match state.rate_limiter.check(&key) {
        Ok(()) => next.run(request).await,
        Err(RateLimitError::RateLimitExceeded { retry_after_seconds }) => {
            tracing::debug!(client = %key, "Rate limit exceeded");
            let mut response = AppError::new(
                StatusCode::TOO_MANY_REQUESTS,
                format!("Rate limit exceeded. Try again in {retry_after_seconds} seconds"),
            )
            .into_response();

            let headers = response.headers_mut();
            headers.insert(header::RETRY_AFTER, HeaderValue::from(retry_after_seconds));
            headers.insert(
                X_RATELIMIT_LIMIT.clone(),
                HeaderValue::from(state.rate_limiter.limit()),
            );
            response
        }
    }
}

/// Security headers middleware
///
/// Adds security-related HTTP headers to all responses:
/// - X-Frame-Options: Prevents clickjacking
/// - X-Content-Type-Options: Prevents MIME type sniffing
/// - Content-Security-Policy: Restricts resource loading
/// - Referrer-Policy: Controls referrer information
/// - Permissions-Policy: Restricts browser features
/// - Strict-Transport-Security: Enforces HTTPS (only if configured)
///
/// Headers already set by a handler are left alone.
pub async fn security_headers_middleware(
    State(policy): State<SecurityPolicy>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    let defaults = [
        (X_FRAME_OPTIONS.clone(), "DENY"),
        (X_CONTENT_TYPE_OPTIONS.clone(), "nosniff"),
        (
            CONTENT_SECURITY_POLICY.clone(),
            "default-src 'none'; frame-ancestors 'none'; base-uri 'none'",
        ),
        (REFERRER_POLICY.clone(), "strict-origin-when-cross-origin"),
        (
            PERMISSIONS_POLICY.clone(),
            "accelerometer=(), camera=(), geolocation=(), gyroscope=(), \
             magnetometer=(), microphone=(), payment=(), usb=()",
        ),
        (header::CACHE_CONTROL, "no-store"),
    ];
    for (name, value) in defaults {
        if !headers.contains_key(&name) {
            headers.insert(name, HeaderValue::from_static(value));
        }
    }

    if let Some(hsts) = policy.hsts() {
        if !headers.contains_key(header::STRICT_TRANSPORT_SECURITY) {
            headers.insert(header::STRICT_TRANSPORT_SECURITY, hsts.clone());
        }
    }

    response
}

/// HSTS (HTTP Strict Transport Security) header value
///
/// * `max_age` - seconds the browser should remember to use HTTPS only
/// * `include_subdomains` - apply the rule to all subdomains as well
#[must_use]
pub fn hsts_header(max_age: u64, include_subdomains: bool) -> String {
    let mut value = format!("max-age={max_age}");

    if include_subdomains {
        value.push_str("; includeSubDomains");
    }

    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hsts_header() {
        assert_eq!(hsts_header(31_536_000, false), "max-age=31536000");
        assert_eq!(hsts_header(600, true), "max-age=600; includeSubDomains");
    }
}
