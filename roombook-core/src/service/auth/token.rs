//! Access token validation for HTTP requests
//!
//! Tokens are issued elsewhere; this service only verifies them. A token is
//! read from the `Authorization: Bearer` header, or from the access-token
//! cookie when the header is absent.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::JwtConfig;
use crate::{Error, Result};

/// Claims carried by an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// User role (student, teacher, admin)
    #[serde(default)]
    pub role: Option<String>,
    /// Token type, `access` or `refresh`
    #[serde(default, rename = "type")]
    pub typ: Option<String>,
    /// Issued at (Unix timestamp)
    #[serde(default)]
    pub iat: Option<i64>,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Numeric user ID, when the subject is one
    pub fn user_id(&self) -> Result<i64> {
        self.sub
            .parse()
            .map_err(|_| Error::Authentication(format!("Invalid subject in token: {}", self.sub)))
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some("admin")
    }

    #[must_use]
    pub fn is_access_token(&self) -> bool {
        self.typ.as_deref().map_or(true, |t| t == "access")
    }
}

/// HS256 token validator
///
/// Built from an empty secret it has no key and rejects every token.
#[derive(Clone)]
pub struct TokenValidator {
    decoding_key: Option<Arc<DecodingKey>>,
    validation: Validation,
    cookie_name: String,
}

impl std::fmt::Debug for TokenValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenValidator")
            .field("cookie_name", &self.cookie_name)
            .field("has_key", &self.decoding_key.is_some())
            .finish()
    }
}

impl TokenValidator {
    #[must_use]
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            decoding_key: (!config.secret.is_empty())
                .then(|| Arc::new(DecodingKey::from_secret(config.secret.as_bytes()))),
            validation: Validation::new(Algorithm::HS256),
            cookie_name: config.cookie_name.clone(),
        }
    }

    #[must_use]
    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Extract bearer token from Authorization header value
    pub fn extract_bearer_token(auth_value: &str) -> Result<&str> {
        auth_value
            .strip_prefix("Bearer ")
            .or_else(|| auth_value.strip_prefix("bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                Error::Authentication("Authorization header must start with 'Bearer '".to_string())
            })
    }

    /// Find the access-token cookie in a `Cookie` header value
    #[must_use]
    pub fn token_from_cookies<'a>(&self, cookie_header: &'a str) -> Option<&'a str> {
        cookie_header
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == self.cookie_name)
            .map(|(_, value)| value.trim())
            .filter(|value| !value.is_empty())
    }

    /// Verify signature and expiry, and reject refresh tokens
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        let key = self
            .decoding_key
            .as_deref()
            .ok_or_else(|| Error::Authentication("Token authentication is not configured".to_string()))?;
        let data = decode::<Claims>(token, key, &self.validation)
            .map_err(|e| Error::Authentication(format!("Invalid token: {e}")))?;

        if !data.claims.is_access_token() {
            return Err(Error::Authentication("Expected an access token".to_string()));
        }
        Ok(data.claims)
    }

    /// Validate a token taken from an Authorization header value
    pub fn validate_http(&self, auth_header: &str) -> Result<Claims> {
        let token = Self::extract_bearer_token(auth_header)?;
        self.validate_token(token)
    }
}
