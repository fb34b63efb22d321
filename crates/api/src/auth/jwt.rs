//! Access tokens.
//!
//! HS256 JWTs whose subject is the user id. Keys are derived once at startup
//! and shared through [`AppState`](crate::state::AppState). No refresh tokens
//! are issued; a client logs in again once its token lapses.

use std::fmt;

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use eventsync_core::types::DbId;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: DbId,
    exp: i64,
    iat: i64,
    /// Random per token so two logins in the same second differ.
    jti: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,
    #[error("token is malformed or not signed by this server")]
    Invalid,
    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Issues and verifies access tokens with one HMAC secret.
#[derive(Clone)]
pub struct AccessTokens {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    lifetime: Duration,
}

impl AccessTokens {
    pub fn new(secret: &str, lifetime_mins: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            lifetime: Duration::minutes(lifetime_mins),
        }
    }

    pub fn issue(&self, user_id: DbId) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            exp: (now + self.lifetime).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(TokenError::Signing)
    }

    /// The user id carried by a valid, unexpired token.
    pub fn verify(&self, token: &str) -> Result<DbId, TokenError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims.sub)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }
}

impl fmt::Debug for AccessTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessTokens")
            .field("lifetime_mins", &self.lifetime.num_minutes())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    const SECRET: &str = "unit-test-secret-long-enough-for-hmac";

    fn sign(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_issued_token_verifies_to_its_user() {
        let tokens = AccessTokens::new(SECRET, 30);
        let token = tokens.issue(42).unwrap();
        assert_eq!(tokens.verify(&token).unwrap(), 42);
    }

    #[test]
    fn test_tokens_for_the_same_user_differ() {
        let tokens = AccessTokens::new(SECRET, 30);
        assert_ne!(tokens.issue(7).unwrap(), tokens.issue(7).unwrap());
    }

    #[test]
    fn test_expired_token_is_reported_as_expired() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            exp: now - 10,
            iat: now - 600,
            jti: Uuid::new_v4(),
        };
        let token = sign(&claims, SECRET);
        assert_matches!(
            AccessTokens::new(SECRET, 30).verify(&token),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_negative_lifetime_token_is_already_expired() {
        let tokens = AccessTokens::new(SECRET, -1);
        let token = tokens.issue(3).unwrap();
        assert_matches!(tokens.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_foreign_secret_is_invalid() {
        let ours = AccessTokens::new(SECRET, 30);
        let theirs = AccessTokens::new("some-other-secret", 30);
        let token = theirs.issue(1).unwrap();
        assert_matches!(ours.verify(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn test_other_algorithm_is_invalid() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            exp: now + 600,
            iat: now,
            jti: Uuid::new_v4(),
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert_matches!(
            AccessTokens::new(SECRET, 30).verify(&token),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn test_garbage_is_invalid() {
        let tokens = AccessTokens::new(SECRET, 30);
        assert_matches!(tokens.verify("not.a.jwt"), Err(TokenError::Invalid));
        assert_matches!(tokens.verify(""), Err(TokenError::Invalid));
    }

    #[test]
    fn test_debug_hides_keys() {
        let rendered = format!("{:?}", AccessTokens::new(SECRET, 30));
        assert!(!rendered.contains(SECRET));
        assert!(rendered.contains("lifetime_mins: 30"));
    }
}
