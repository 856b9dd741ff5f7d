pub mod identity;
pub mod password;

use anyhow::Result;
use async_trait::async_trait;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use uuid::Uuid;

pub use identity::{IdentityService, Session};

pub const ACCESS_TOKEN_DURATION: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // User ID
    pub iat: u64,
    pub exp: u64,
}

impl Claims {
    pub fn user_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }
}

#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Validate signature and expiry; `None` for anything unacceptable.
    async fn verify(&self, token: &str) -> Option<Claims>;
}

/// Issues and verifies HS256 access tokens signed with a shared secret.
pub struct Hs256Tokens {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl Hs256Tokens {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: ACCESS_TOKEN_DURATION,
        }
    }

    pub fn issue(&self, user_id: Uuid) -> Result<String> {
        let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
        self.encode_claims(&Claims {
            sub: user_id.to_string(),
            iat: now,
            exp: now + self.ttl.as_secs(),
        })
    }

    fn encode_claims(&self, claims: &Claims) -> Result<String> {
        Ok(encode(&Header::new(Algorithm::HS256), claims, &self.encoding)?)
    }
}

#[async_trait]
impl TokenVerifier for Hs256Tokens {
    async fn verify(&self, token: &str) -> Option<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        decode::<Claims>(token, &self.decoding, &validation)
            .ok()
            .map(|d| d.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn issued_token_round_trips_user() {
        let tokens = Hs256Tokens::new("secret");
        let user = Uuid::new_v4();
        let token = tokens.issue(user).unwrap();
        let claims = tokens.verify(&token).await.unwrap();
        assert_eq!(claims.user_id(), Some(user));
        assert_eq!(claims.exp - claims.iat, ACCESS_TOKEN_DURATION.as_secs());
    }

    #[tokio::test]
    async fn expired_token_rejected() {
        let tokens = Hs256Tokens::new("secret");
        let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs();
        let token = tokens
            .encode_claims(&Claims {
                sub: Uuid::new_v4().to_string(),
                iat: now - 600,
                exp: now - 300,
            })
            .unwrap();
        assert!(tokens.verify(&token).await.is_none());
    }

    #[tokio::test]
    async fn foreign_signature_rejected() {
        let ours = Hs256Tokens::new("secret");
        let theirs = Hs256Tokens::new("other-secret");
        let token = theirs.issue(Uuid::new_v4()).unwrap();
        assert!(ours.verify(&token).await.is_none());
        assert!(ours.verify("not-a-token").await.is_none());
    }
}
