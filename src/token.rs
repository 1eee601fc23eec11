use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    /// Unique per token.
    pub jti: String,
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    /// `None` when `exp` is outside the range chrono can represent.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let secs = i64::try_from(self.exp).ok()?;
        Utc.timestamp_opt(secs, 0).single()
    }
}

/// HS256 signing keys plus the lifetime given to new tokens.
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtKeys {
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::seconds(ttl_secs),
        }
    }

    pub fn issue(&self, user_id: Uuid, username: &str) -> jsonwebtoken::errors::Result<String> {
        let now = Utc::now();
        let exp = now + self.ttl;
        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            jti: Uuid::new_v4().to_string(),
            exp: exp.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding)
    }

    /// Checks signature and expiry.
    pub fn verify(&self, token: &str) -> jsonwebtoken::errors::Result<Claims> {
        decode::<Claims>(token, &self.decoding, &Validation::default()).map(|data| data.claims)
    }
}
