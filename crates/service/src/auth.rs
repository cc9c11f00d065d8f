//! Signed credentials built from [`UserClaims`].

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use models::user::UserClaims;

use crate::errors::ServiceError;

/// Token issuing configuration
#[derive(Clone)]
pub struct TokenConfig {
    pub secret: String,
    pub ttl_secs: u64,
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig").field("secret", &"<redacted>").field("ttl_secs", &self.ttl_secs).finish()
    }
}

/// JWT payload: the claim set plus issue/expiry times.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TokenClaims {
    #[serde(flatten)]
    user: UserClaims,
    iat: u64,
    exp: u64,
}

/// HS256 signer/verifier for user claims.
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(cfg: &TokenConfig) -> Result<Self, ServiceError> {
        if cfg.secret.is_empty() {
            return Err(ServiceError::Token("jwt secret is empty".into()));
        }
        let ttl = i64::try_from(cfg.ttl_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .ok_or_else(|| ServiceError::Token(format!("token ttl {}s out of range", cfg.ttl_secs)))?;
        Ok(Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            ttl,
        })
    }

    pub fn issue(&self, claims: &UserClaims) -> Result<String, ServiceError> {
        self.issue_at(claims, Utc::now())
    }

    /// Issue as if at `issued_at`; expiry is `issued_at + ttl`.
    pub fn issue_at(&self, claims: &UserClaims, issued_at: DateTime<Utc>) -> Result<String, ServiceError> {
        let expires_at = issued_at
            .checked_add_signed(self.ttl)
            .ok_or_else(|| ServiceError::Token("token expiry out of range".into()))?;
        let payload = TokenClaims {
            user: claims.clone(),
            iat: issued_at.timestamp().max(0) as u64,
            exp: expires_at.timestamp().max(0) as u64,
        };
        encode(&Header::new(Algorithm::HS256), &payload, &self.encoding).map_err(|e| ServiceError::Token(e.to_string()))
    }

    /// Check signature and expiry and return the embedded claims.
    pub fn verify(&self, token: &str) -> Result<UserClaims, ServiceError> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<TokenClaims>(token, &self.decoding, &validation).map_err(|e| ServiceError::Token(e.to_string()))?;
        Ok(data.claims.user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer(secret: &str) -> TokenIssuer {
        TokenIssuer::new(&TokenConfig { secret: secret.into(), ttl_secs: 3600 }).expect("issuer")
    }

    fn claims() -> UserClaims { UserClaims { sub: "1".into(), email: "alice@example.com".into() } }

    #[test]
    fn issue_then_verify_returns_claims() {
        let t = issuer("secret");
        let token = t.issue(&claims()).unwrap();
        assert_eq!(t.verify(&token).unwrap(), claims());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issuer("secret").issue(&claims()).unwrap();
        assert!(matches!(issuer("other").verify(&token), Err(ServiceError::Token(_))));
    }

    #[test]
    fn expired_token_is_rejected() {
        let t = issuer("secret");
        let token = t.issue_at(&claims(), Utc::now() - Duration::days(1)).unwrap();
        assert!(matches!(t.verify(&token), Err(ServiceError::Token(_))));
    }

    #[test]
    fn empty_secret_is_refused() {
        let err = TokenIssuer::new(&TokenConfig { secret: String::new(), ttl_secs: 60 }).err().unwrap();
        assert!(matches!(err, ServiceError::Token(_)));
    }

    #[test]
    fn oversized_ttl_is_an_error() {
        let cfg = TokenConfig { secret: "secret".into(), ttl_secs: 100_000_000_000_000_000 };
        assert!(matches!(TokenIssuer::new(&cfg), Err(ServiceError::Token(_))));
    }

    #[test]
    fn expiry_overflow_is_an_error() {
        let t = TokenIssuer::new(&TokenConfig { secret: "secret".into(), ttl_secs: 9_000_000_000_000_000 }).expect("issuer");
        assert!(matches!(t.issue(&claims()), Err(ServiceError::Token(_))));
    }

    #[test]
    fn debug_hides_secret() {
        let cfg = TokenConfig { secret: "hunter2".into(), ttl_secs: 1 };
        assert!(!format!("{cfg:?}").contains("hunter2"));
    }
}
