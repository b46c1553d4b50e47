//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Bearer-token configuration.
///
/// Tokens are issued by the external identity provider; DocShare only
/// verifies them with the shared HMAC secret.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT verification (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Allowed clock skew in seconds when checking `exp`.
    #[serde(default = "default_leeway")]
    pub leeway_seconds: u64,
    /// TTL in minutes for tokens minted locally by `JwtEncoder`.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_minutes: u64,
    /// App name assumed when a token carries no `app` claim.
    #[serde(default = "default_app")]
    pub default_app: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            leeway_seconds: default_leeway(),
            access_ttl_minutes: default_access_ttl(),
            default_app: default_app(),
        }
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_leeway() -> u64 {
    5
}

fn default_access_ttl() -> u64 {
    60
}

fn default_app() -> String {
    "fintutto".to_string()
}
