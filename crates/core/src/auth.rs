//! Role-bearing session tokens.
//!
//! The legacy site shipped a base64-encoded JSON blob as its "token";
//! here that becomes a signed HS256 token whose `role` claim is verified
//! server-side. The consistency layer itself only ever asks one question:
//! may the caller write.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Mitarbeiter,
    Customer,
}

impl Role {
    /// Editors (admin and staff) may mutate catalog content.
    pub fn can_write(self) -> bool {
        matches!(self, Role::Admin | Role::Mitarbeiter)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account identifier, informational only.
    pub sub: String,
    pub role: Role,
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
}

pub fn issue_token(
    sub: &str,
    role: Role,
    ttl: Duration,
    secret: &str,
) -> Result<String, AuthError> {
    let claims = Claims {
        sub: sub.to_string(),
        role,
        exp: (Utc::now() + ttl).timestamp(),
    };
    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}
