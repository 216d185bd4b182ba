//! Baseline security header policy

use axum::http::HeaderValue;
use roombook_core::config::SecurityConfig;

use super::middleware::hsts_header;

/// Security headers applied to every response
#[derive(Debug, Clone, Default)]
pub struct SecurityPolicy {
    hsts: Option<HeaderValue>,
}

impl SecurityPolicy {
    #[must_use]
    pub fn from_config(config: &SecurityConfig) -> Self {
        let hsts = config.hsts_max_age.map(|max_age| {
            // Digits and ASCII only, always a valid header value
            HeaderValue::from_str(&hsts_header(max_age, config.hsts_include_subdomains))
                .unwrap_or_else(|_| HeaderValue::from_static("max-age=0"))
        });
        Self { hsts }
    }

    /// Strict-Transport-Security value, when HSTS is enabled
    #[must_use]
    pub const fn hsts(&self) -> Option<&HeaderValue> {
        self.hsts.as_ref()
    }
}
