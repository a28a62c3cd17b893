use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use shared_models::auth::{JwtClaims, Role};
use shared_models::error::AppError;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,

    #[error("invalid token: {0}")]
    Invalid(String),

    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired | TokenError::Invalid(_) => {
                AppError::Auth("invalid or expired token".to_string())
            }
            TokenError::Signing(msg) => AppError::Internal(msg),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    /// Lifetime in seconds.
    pub expires_in: u64,
}

/// HS256 issuer and verifier bound to one secret.
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    pub fn issue(&self, user_id: Uuid, role: Role) -> Result<IssuedToken, TokenError> {
        let iat = Utc::now().timestamp().max(0) as u64;
        let expires_in = self.ttl.as_secs();
        let claims = JwtClaims {
            sub: user_id,
            role,
            iat,
            exp: iat + expires_in,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        debug!("Issued token for user {} ({})", user_id, role);
        Ok(IssuedToken { token, expires_in })
    }

    pub fn validate_token(&self, token: &str) -> Result<JwtClaims, TokenError> {
        decode::<JwtClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => {
                    debug!("Token expired");
                    TokenError::Expired
                }
                _ => {
                    debug!("Token validation failed: {}", e);
                    TokenError::Invalid(e.to_string())
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn test_issued_token_round_trips_claims() {
        let service = JwtService::new(SECRET, Duration::from_secs(3600));
        let user_id = Uuid::new_v4();

        let issued = service.issue(user_id, Role::Doctor).unwrap();
        assert_eq!(issued.expires_in, 3600);

        let claims = service.validate_token(&issued.token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, Role::Doctor);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let issuer = JwtService::new("someone-else", Duration::from_secs(3600));
        let verifier = JwtService::new(SECRET, Duration::from_secs(3600));

        let issued = issuer.issue(Uuid::new_v4(), Role::Patient).unwrap();
        assert_matches!(verifier.validate_token(&issued.token), Err(TokenError::Invalid(_)));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let service = JwtService::new(SECRET, Duration::from_secs(3600));
        let past = (Utc::now().timestamp() - 7200) as u64;
        let claims = JwtClaims {
            sub: Uuid::new_v4(),
            role: Role::Patient,
            iat: past,
            exp: past + 60,
        };
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap();

        assert_matches!(service.validate_token(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_garbage_is_rejected() {
        let service = JwtService::new(SECRET, Duration::from_secs(60));
        assert_matches!(service.validate_token("invalid.token.format"), Err(TokenError::Invalid(_)));
    }
}
