//! Cross-origin policy built from configuration

use axum::http::{HeaderName, HeaderValue, Method};
use roombook_core::{bootstrap::BootstrapError, config::CorsConfig};
use tower_http::cors::{AllowOrigin, CorsLayer};

const ALLOWED_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PATCH,
    Method::DELETE,
    Method::OPTIONS,
];

/// Build the CORS layer.
///
/// Credentials are always allowed, so a `*` origin mirrors the request origin
/// instead of sending a literal wildcard. Origins that are not listed never
/// get an `Access-Control-Allow-Origin` header.
pub fn cors_layer(config: &CorsConfig) -> Result<CorsLayer, BootstrapError> {
    let allow_origin = if config.origins.iter().any(|o| o.trim() == "*") {
        AllowOrigin::mirror_request()
    } else {
        let origins = config
            .origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin.trim().trim_end_matches('/'))
                    .map_err(|e| BootstrapError::Cors(format!("invalid origin {origin:?}: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(origins)
    };

    let headers = config
        .headers
        .split(',')
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .map(|h| HeaderName::from_bytes(h.as_bytes()).map_err(|e| BootstrapError::Cors(format!("invalid header {h:?}: {e}"))))
        .collect::<Result<Vec<_>, _>>()?;
    if headers.is_empty() {
        return Err(BootstrapError::Cors("no allowed request headers configured".to_string()));
    }

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(ALLOWED_METHODS.to_vec())
        .allow_headers(headers)
        .allow_credentials(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(origins: &[&str], headers: &str) -> CorsConfig {
        CorsConfig {
            origins: origins.iter().map(ToString::to_string).collect(),
            headers: headers.to_string(),
        }
    }

    #[test]
    fn test_valid_configs_build() {
        assert!(cors_layer(&CorsConfig::default()).is_ok());
        assert!(cors_layer(&config(&["https://rooms.example"], "Content-Type, Authorization")).is_ok());
        assert!(cors_layer(&config(&["*"], "Content-Type")).is_ok());
    }

    #[test]
    fn test_invalid_header_is_rejected() {
        let err = cors_layer(&config(&[], "Content Type")).unwrap_err();
        assert!(matches!(err, BootstrapError::Cors(_)));
    }

    #[test]
    fn test_invalid_origin_is_rejected() {
        let err = cors_layer(&config(&["https://rooms\u{7f}.example"], "Content-Type")).unwrap_err();
        assert!(matches!(err, BootstrapError::Cors(_)));
    }

    #[test]
    fn test_empty_header_list_is_rejected() {
        assert!(cors_layer(&config(&[], " , ")).is_err());
    }
}
