//! Request context carrying the authenticated caller.

use chrono::{DateTime, Utc};

use docshare_auth::Identity;

/// Context for the current authenticated request.
///
/// Built by the HTTP extractor and passed into every service method so
/// that each operation knows who is acting, from which app and from
/// where.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// The verified caller.
    pub identity: Identity,
    /// IP address of the request origin.
    pub ip_address: Option<String>,
    /// User-Agent header value.
    pub user_agent: Option<String>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(identity: Identity, ip_address: Option<String>, user_agent: Option<String>) -> Self {
        Self {
            identity,
            ip_address,
            user_agent,
            request_time: Utc::now(),
        }
    }

    /// The caller's lower-cased email.
    pub fn email(&self) -> &str {
        &self.identity.email
    }

    /// The app the caller acts from.
    pub fn app(&self) -> &str {
        &self.identity.app
    }

    /// Returns whether the caller is an admin.
    pub fn is_admin(&self) -> bool {
        self.identity.is_admin()
    }
}
