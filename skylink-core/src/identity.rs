use serde::{Deserialize, Serialize};

/// Credential attached to every outbound inventory/partner call.
///
/// The identity layer verifies whatever the caller presented and re-signs a
/// short-lived service assertion before it lands here; downstream services
/// never see the caller's raw token.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForwardableCredential {
    pub bearer: Option<String>,
    pub api_key: Option<String>,
}

impl ForwardableCredential {
    pub fn bearer(token: String) -> Self {
        Self {
            bearer: Some(token),
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: String) -> Self {
        self.api_key = Some(api_key);
        self
    }
}

/// Resolved identity of the caller of an orchestrator operation.
///
/// Produced by the transport layer from inbound request metadata; the core
/// only reads it. An unauthenticated context is still a valid value - the
/// operations decide what they require.
#[derive(Debug, Clone, Default)]
pub struct CallerContext {
    pub user_id: Option<i64>,
    pub role: Option<String>,
    pub is_authenticated: bool,
    pub credential: ForwardableCredential,
}

impl CallerContext {
    /// Context for a request that carried no usable credentials.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Context for a signed-in user.
    pub fn user(user_id: i64, role: impl Into<String>, credential: ForwardableCredential) -> Self {
        Self {
            user_id: Some(user_id),
            role: Some(role.into()),
            is_authenticated: true,
            credential,
        }
    }

    /// Context for a server-to-server partner call (shared key, no end user).
    pub fn partner(api_key: String) -> Self {
        Self {
            user_id: None,
            role: None,
            is_authenticated: false,
            credential: ForwardableCredential::default().with_api_key(api_key),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some("ADMIN")
    }
}
