use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;

use sober_types::api::Claims;

/// How long an issued token stays valid.
pub const TOKEN_TTL_MINUTES: i64 = 15;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token signing failed: {0}")]
    Signing(String),

    /// Bad structure, bad signature, wrong algorithm and expiry all land
    /// here so callers cannot tell them apart.
    #[error("invalid token")]
    Invalid,
}

/// Issues and verifies HS256 bearer tokens with a shared secret.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenIssuer {
    pub fn new(secret: &str) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::Signing("signing secret is empty".into()));
        }

        // Only HS256 is accepted. Expiry is checked in verify_at against the
        // caller's clock, with no leeway.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    pub fn issue(&self, account_id: i64, username: &str, email: &str) -> Result<String, TokenError> {
        self.issue_at(account_id, username, email, Utc::now())
    }

    pub fn issue_at(
        &self,
        account_id: i64,
        username: &str,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let expires_at = (now + Duration::minutes(TOKEN_TTL_MINUTES)).timestamp();
        let claims = Claims {
            sub: account_id,
            username: username.to_string(),
            email: email.to_string(),
            exp: usize::try_from(expires_at)
                .map_err(|_| TokenError::Signing("expiry before unix epoch".into()))?,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| TokenError::Invalid)?;

        let exp = i64::try_from(data.claims.exp).map_err(|_| TokenError::Invalid)?;
        if exp <= now.timestamp() {
            return Err(TokenError::Invalid);
        }

        Ok(data.claims)
    }
}
