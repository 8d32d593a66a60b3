#![allow(dead_code)]

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::ProfileRow;
use crate::state::AppState;

/// JWT claims carried by the bearer token. Token issuance lives outside this
/// service; tests and local tooling use [`mint_token`].
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: i64,
}

pub fn mint_token(user_id: Uuid, secret: &str, ttl_secs: i64) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user_id,
        exp: Utc::now().timestamp() + ttl_secs,
    };
    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}

pub fn validate_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

/// Authenticated user extracted from a `Bearer` token in the Authorization
/// header. Handlers that mutate state take this as a parameter; read-only
/// handlers take `Option<AuthUser>` so drafts stay owner-visible only.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: Uuid,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AppError::Unauthorized)?;

        let claims = validate_token(token, &state.config.jwt_secret)
            .map_err(|_| AppError::Unauthorized)?;

        Ok(AuthUser {
            user_id: claims.sub,
        })
    }
}

/// Loads the profile behind `username` and checks the caller owns it.
/// Non-owners get a distinct "request access" signal, not a 404.
pub async fn require_profile_owner(
    pool: &PgPool,
    username: &str,
    user: AuthUser,
) -> Result<ProfileRow, AppError> {
    let profile = crate::profiles::store::find_by_username(pool, username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile '{username}' not found")))?;

    if profile.user_id != user.user_id {
        return Err(AppError::RequestAccess);
    }
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mint_and_validate_roundtrip() {
        let user_id = Uuid::new_v4();
        let token = mint_token(user_id, "test-secret", 3600).unwrap();
        let claims = validate_token(&token, "test-secret").unwrap();
        assert_eq!(claims.sub, user_id);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = mint_token(Uuid::new_v4(), "secret-a", 3600).unwrap();
        assert!(validate_token(&token, "secret-b").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = mint_token(Uuid::new_v4(), "test-secret", -120).unwrap();
        assert!(validate_token(&token, "test-secret").is_err());
    }
}
