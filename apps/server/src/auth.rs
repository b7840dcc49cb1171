//! Bearer-token authentication.
//!
//! The server verifies an externally issued JWT carrying an opaque user
//! id (`sub`) and role claim; it never re-derives identity itself.
//! Handlers read the resulting [`AuthUser`] from request extensions.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::AppState;
use tally_core::Role;

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,

    /// Access role
    pub role: Role,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// Verified identity attached to the request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub role: Role,
}

/// Middleware verifying the bearer token and inserting [`AuthUser`].
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized("Missing authorization header"))?;

    let token = extract_bearer_token(header)
        .ok_or_else(|| ApiError::unauthorized("Expected bearer token"))?;

    let claims = verify_token(token, &state.config.jwt_secret)?;

    request.extensions_mut().insert(AuthUser {
        id: claims.sub,
        role: claims.role,
    });

    Ok(next.run(request).await)
}

/// Validate and decode a token.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, ApiError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| ApiError::unauthorized(format!("Invalid token: {e}")))?;

    Ok(token_data.claims)
}

/// Extract bearer token from an authorization header value.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn issue_token(secret: &str, user_id: &str, role: Role, lifetime_secs: i64) -> String {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            role,
            iat: now.timestamp(),
            exp: (now + Duration::seconds(lifetime_secs)).timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn token_roundtrip() {
        let token = issue_token("test-secret", "user-001", Role::Staff, 3600);
        let claims = verify_token(&token, "test-secret").unwrap();
        assert_eq!(claims.sub, "user-001");
        assert_eq!(claims.role, Role::Staff);
    }

    #[test]
    fn wrong_secret_rejected() {
        let token = issue_token("test-secret", "user-001", Role::Admin, 3600);
        assert!(verify_token(&token, "other-secret").is_err());
    }

    #[test]
    fn expired_token_rejected() {
        let token = issue_token("test-secret", "user-001", Role::Admin, -120);
        assert!(verify_token(&token, "test-secret").is_err());
    }

    #[test]
    fn bearer_extraction() {
        assert_eq!(extract_bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
    }
}
