//! Basic-auth based authentication extractor plus password helpers.
use axum::{
    Extension,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use std::future::Future;

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use rand_core::OsRng;

use crate::SharedState;
use crate::db::RepoError;
use crate::models::User;

/// Axum extractor that verifies Basic credentials (email + password) against
/// the `users` table.
pub struct Authenticated(pub User);

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> {
        Box::pin(async move {
            let Extension(app_state): Extension<SharedState> =
                Extension::from_request_parts(parts, state)
                    .await
                    .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "missing state"))?;

            let auth_header = parts
                .headers
                .get(axum::http::header::AUTHORIZATION)
                .ok_or((StatusCode::UNAUTHORIZED, "missing Authorization header"))?
                .to_str()
                .map_err(|_| (StatusCode::BAD_REQUEST, "invalid Authorization header"))?;

            let Some(b64) = auth_header.strip_prefix("Basic ") else {
                return Err((StatusCode::UNAUTHORIZED, "expected Basic auth"));
            };

            let decoded = BASE64
                .decode(b64)
                .map_err(|_| (StatusCode::BAD_REQUEST, "invalid Base64"))?;
            let decoded = String::from_utf8(decoded)
                .map_err(|_| (StatusCode::BAD_REQUEST, "invalid UTF-8"))?;

            let (email, password) = decoded
                .split_once(':')
                .ok_or((StatusCode::BAD_REQUEST, "invalid Basic payload"))?;

            let user = app_state
                .repo
                .get_user_by_email(email)
                .await
                .map_err(lookup_rejection)?;

            if !verify_password(&user.password, password)
                .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "hash error"))?
            {
                return Err((StatusCode::UNAUTHORIZED, "invalid credentials"));
            }

            Ok(Authenticated(user))
        })
    }
}

/// Unknown emails are bad credentials; storage failures are not the caller's fault.
fn lookup_rejection(err: RepoError) -> (StatusCode, &'static str) {
    match err {
        RepoError::NotFound => (StatusCode::UNAUTHORIZED, "invalid credentials"),
        RepoError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "database timed out"),
        other => {
            tracing::error!("basic auth lookup failed: {other}");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
        }
    }
}

/// Hash a plaintext password using Argon2 + random salt.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|_| anyhow::anyhow!("Failed to hash password"))?
        .to_string();
    Ok(hash)
}

/// Verify a plaintext password against a stored Argon2 hash.
pub fn verify_password(hash: &str, plain: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|_| anyhow::anyhow!("Failed to instantiate PasswordHash"))?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashed_password_verifies() {
        let hash = hash_password("secret").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password(&hash, "secret").unwrap());
        assert!(!verify_password(&hash, "Secret").unwrap());
    }

    #[test]
    fn lookup_failures_keep_their_cause() {
        assert_eq!(
            lookup_rejection(RepoError::NotFound).0,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            lookup_rejection(RepoError::Timeout(std::time::Duration::from_secs(3))).0,
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            lookup_rejection(RepoError::Connection(sqlx::Error::PoolClosed)).0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn garbage_hash_is_an_error() {
        assert!(verify_password("not-a-phc-string", "secret").is_err());
    }
}
