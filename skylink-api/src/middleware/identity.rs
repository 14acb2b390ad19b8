use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use skylink_core::{CallerContext, ForwardableCredential};

use crate::state::{AppState, IdentityConfig};

/// Claims accepted on inbound caller tokens. Issuers differ on the user id
/// field name, so both spellings are accepted.
#[derive(Debug, Deserialize)]
struct InboundClaims {
    #[serde(default)]
    id: Option<i64>,
    #[serde(default, rename = "userId")]
    user_id: Option<i64>,
    #[serde(default)]
    role: Option<String>,
    #[allow(dead_code)]
    exp: usize,
}

/// Short-lived assertion minted for outbound calls. Remote services see
/// this instead of the caller's raw token.
#[derive(Debug, Serialize, Deserialize)]
struct ServiceClaims {
    sub: i64,
    role: String,
    iss: String,
    exp: usize,
}

/// Resolve the caller's identity for every request and stash it in request
/// extensions. Never rejects on its own - an anonymous context is still a
/// context, and each operation decides what it requires.
pub async fn identity_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let caller = resolve_caller(&state.identity, req.headers());
    req.extensions_mut().insert(caller);
    next.run(req).await
}

fn resolve_caller(config: &IdentityConfig, headers: &HeaderMap) -> CallerContext {
    // The partner key is verified here; only a matching key is forwarded
    let api_key = headers
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .filter(|k| *k == config.partner_api_key)
        .map(String::from);

    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let claims = token.and_then(|t| {
        decode::<InboundClaims>(
            t,
            &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .ok()
        .map(|data| data.claims)
    });

    match claims {
        Some(claims) => {
            let user_id = claims.id.or(claims.user_id);
            let bearer = user_id.and_then(|uid| {
                resign_service_token(config, uid, claims.role.as_deref().unwrap_or("CUSTOMER"))
            });
            CallerContext {
                user_id,
                role: claims.role,
                is_authenticated: true,
                credential: ForwardableCredential { bearer, api_key },
            }
        }
        None => CallerContext {
            user_id: None,
            role: None,
            is_authenticated: false,
            credential: ForwardableCredential {
                bearer: None,
                api_key,
            },
        },
    }
}

fn resign_service_token(config: &IdentityConfig, user_id: i64, role: &str) -> Option<String> {
    let claims = ServiceClaims {
        sub: user_id,
        role: role.to_string(),
        iss: "skylink-booking".to_string(),
        exp: (Utc::now() + Duration::seconds(config.service_token_ttl as i64)).timestamp()
            as usize,
    };

    match encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    ) {
        Ok(token) => Some(token),
        Err(e) => {
            tracing::warn!("Failed to re-sign service token: {}", e);
            None
        }
    }
}
